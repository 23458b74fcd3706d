use anyhow::Context;
use slgraph_sweep_core::{
    Agreement, Executor, ProcessExecutor, ReportOptions, Reporter, RunConfig, Seed, Sweep,
    TesterPaths, Variant, DEFAULT_DEGREE_BOUND, DEFAULT_EPSILON, DEFAULT_GRAPH,
    DEFAULT_SEED_END, DEFAULT_SEED_START,
};
use std::path::PathBuf;
use std::time::Duration;

mod logging;

/// Run the basic and improved graph-property testers over a range of seeds and compare how often
/// each accepts
#[derive(Debug, clap::Parser)]
struct Args {
    /// Graph file handed to both testers
    #[arg(value_name = "GRAPH", default_value = DEFAULT_GRAPH)]
    graph: String,

    /// Tolerance parameter, passed through as written
    #[arg(value_name = "EPSILON", default_value = DEFAULT_EPSILON)]
    epsilon: String,

    /// Degree bound, passed through as written
    #[arg(value_name = "DEGREE_BOUND", default_value = DEFAULT_DEGREE_BOUND)]
    degree_bound: String,

    /// First seed of the sweep
    #[arg(value_name = "SEED_START", default_value_t = DEFAULT_SEED_START)]
    seed_start: Seed,

    /// Last seed of the sweep (inclusive)
    #[arg(value_name = "SEED_END", default_value_t = DEFAULT_SEED_END)]
    seed_end: Seed,

    /// Directory containing slgraph_tester_basic and slgraph_tester_improved
    #[arg(long, value_name = "DIR", default_value = TesterPaths::DEFAULT_DIR)]
    tester_dir: PathBuf,

    /// Path to the basic tester, overrides --tester-dir
    #[arg(long, value_name = "PATH")]
    basic: Option<PathBuf>,

    /// Path to the improved tester, overrides --tester-dir
    #[arg(long, value_name = "PATH")]
    improved: Option<PathBuf>,

    /// Give up on a tester run that takes longer than this, by default runs are waited on forever
    #[arg(long, value_name = "SECONDS", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Print the stats line of every run
    #[arg(long)]
    show_stats: bool,

    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    color: ColorArg,

    /// Log more, repeat for even more
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl ColorArg {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorArg::Auto => is_terminal,
            ColorArg::Always => true,
            ColorArg::Never => false,
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if secs.is_nan() || secs <= 0.0 {
        return Err("must be greater than 0".into());
    }
    Duration::try_from_secs_f64(secs).map_err(|err| format!("{err}"))
}

impl Args {
    fn config(&self) -> RunConfig {
        RunConfig {
            graph: self.graph.clone(),
            epsilon: self.epsilon.clone(),
            degree_bound: self.degree_bound.clone(),
            seeds: self.seed_start..=self.seed_end,
        }
    }

    fn paths(&self) -> TesterPaths {
        let mut paths = TesterPaths::in_dir(&self.tester_dir);
        if let Some(basic) = &self.basic {
            paths.basic = basic.clone();
        }
        if let Some(improved) = &self.improved {
            paths.improved = improved.clone();
        }
        paths
    }

    fn executor(&self) -> ProcessExecutor {
        let executor = ProcessExecutor::new(self.paths());
        match self.timeout {
            Some(timeout) => executor.timeout(timeout),
            None => executor,
        }
    }
}

/// Sweeps every variant in order, the first failure stops everything
fn run<E, W>(config: &RunConfig, executor: E, reporter: &mut Reporter<W>) -> anyhow::Result<()>
where
    E: Executor,
    W: std::io::Write,
{
    reporter.header(config)?;

    let mut sweep = Sweep::new(executor, config);
    let mut summaries = Vec::with_capacity(Variant::ALL.len());
    for variant in Variant::ALL {
        let summary = sweep
            .run(variant, reporter)
            .with_context(|| format!("{variant} sweep aborted"))?;
        summaries.push(summary);
    }

    if let [basic, improved] = summaries.as_slice() {
        reporter.agreement(&Agreement::between(basic, improved))?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use std::io::IsTerminal;

    let args = Args::parse();

    logging::init(logging::level(args.verbose, args.quiet))?;

    let stdout = std::io::stdout();
    let options = ReportOptions {
        color: args.color.enabled(stdout.is_terminal()),
        show_stats: args.show_stats,
    };
    let mut reporter = Reporter::new(stdout.lock(), options);

    run(&args.config(), args.executor(), &mut reporter)
}
