use crate::{Agreement, Counts, RunConfig, SeedResult, Variant, Verdict};
use owo_colors::OwoColorize;
use std::io::Write;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Colour verdicts and section labels with ANSI escapes
    pub color: bool,
    /// Echo each run's stats line under its seed line
    pub show_stats: bool,
}

/// Writes the human readable sweep report. Doesn't validate anything, it prints what it's given.
pub struct Reporter<W> {
    writer: W,
    options: ReportOptions,
    // a blank line goes between a totals line and whatever follows it
    pending_blank_line: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W, options: ReportOptions) -> Self {
        Self {
            writer,
            options,
            pending_blank_line: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn header(&mut self, config: &RunConfig) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "GRAPH={}  eps={}  d={}  seeds={}..{}",
            config.graph,
            config.epsilon,
            config.degree_bound,
            config.seeds.start(),
            config.seeds.end()
        )?;
        self.pending_blank_line = true;
        self.writer.flush()
    }

    pub fn section(&mut self, variant: Variant) -> std::io::Result<()> {
        self.separate()?;

        let label = format!("{} TESTER", variant.label().to_uppercase());
        if self.options.color {
            writeln!(self.writer, "{}", label.purple())?;
        } else {
            writeln!(self.writer, "{label}")?;
        }
        self.writer.flush()
    }

    pub fn seed(&mut self, result: &SeedResult) -> std::io::Result<()> {
        let verdict = format!("{:6}", result.verdict);
        write!(self.writer, "seed={:2}  ", result.seed)?;
        match (self.options.color, result.verdict) {
            (true, Verdict::Accept) => write!(self.writer, "{}", verdict.green())?,
            (true, Verdict::Reject) => write!(self.writer, "{}", verdict.red())?,
            (false, _) => write!(self.writer, "{verdict}")?,
        }
        writeln!(self.writer, "  {}", result.last_line)?;

        if self.options.show_stats {
            if self.options.color {
                writeln!(self.writer, "  {} {}", "stats:".dimmed(), result.stats_line)?;
            } else {
                writeln!(self.writer, "  stats: {}", result.stats_line)?;
            }
        }

        // flushed per seed so progress is visible while long sweeps run
        self.writer.flush()
    }

    pub fn totals(&mut self, variant: Variant, counts: &Counts) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} TOTAL: ACCEPT={}, REJECT={}",
            variant.label().to_uppercase(),
            counts.accept,
            counts.reject
        )?;
        self.pending_blank_line = true;
        self.writer.flush()
    }

    pub fn agreement(&mut self, agreement: &Agreement) -> std::io::Result<()> {
        self.separate()?;
        writeln!(
            self.writer,
            "AGREEMENT: {}/{} seeds",
            agreement.agree, agreement.compared
        )?;
        self.writer.flush()
    }

    fn separate(&mut self) -> std::io::Result<()> {
        if std::mem::take(&mut self.pending_blank_line) {
            writeln!(self.writer)?;
        }
        Ok(())
    }
}
