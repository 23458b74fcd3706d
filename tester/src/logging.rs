use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;

// Writes log records to stderr so they never end up in the report on stdout
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => " ERR ".black().on_red().to_string(),
            Level::Warn => " WRN ".black().on_yellow().to_string(),
            Level::Info => " INF ".black().on_blue().to_string(),
            Level::Debug => " DBG ".black().on_purple().to_string(),
            Level::Trace => " TRC ".black().on_white().to_string(),
        };
        eprintln!("{tag} {}", record.args());
    }

    fn flush(&self) {}
}

/// Maps `-q` and the number of `-v` flags onto a level, `warn` when neither is given
pub(crate) fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub(crate) fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
