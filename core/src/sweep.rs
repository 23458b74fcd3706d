use crate::{Error, Executor, ParsedOutput, Reporter, Result, RunConfig, Seed, Variant, Verdict};

/// Number of runs per verdict
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub accept: usize,
    pub reject: usize,
}

impl Counts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accept => self.accept += 1,
            Verdict::Reject => self.reject += 1,
        }
    }

    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Accept => self.accept,
            Verdict::Reject => self.reject,
        }
    }

    pub fn total(&self) -> usize {
        self.accept + self.reject
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedResult {
    pub seed: Seed,
    pub verdict: Verdict,
    pub stats_line: String,
    pub last_line: String,
}

/// Everything a completed sweep produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub variant: Variant,
    pub counts: Counts,
    /// In ascending seed order
    pub results: Vec<SeedResult>,
}

/// How often two sweeps over the same seeds agreed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Agreement {
    pub agree: usize,
    pub compared: usize,
}

impl Agreement {
    /// Pairs results by seed, seeds only one side has are skipped
    pub fn between(a: &SweepSummary, b: &SweepSummary) -> Self {
        let mut agreement = Agreement::default();

        let mut rhs = b.results.iter().peekable();
        for lhs in &a.results {
            while rhs.next_if(|r| r.seed < lhs.seed).is_some() {}
            if let Some(r) = rhs.next_if(|r| r.seed == lhs.seed) {
                agreement.compared += 1;
                if r.verdict == lhs.verdict {
                    agreement.agree += 1;
                }
            }
        }

        agreement
    }
}

/// Drives one tester variant over every seed of a [`RunConfig`]
pub struct Sweep<'a, E> {
    executor: E,
    config: &'a RunConfig,
}

impl<'a, E: Executor> Sweep<'a, E> {
    pub fn new(executor: E, config: &'a RunConfig) -> Self {
        Self { executor, config }
    }

    /// Any failed invocation aborts the whole sweep, before the totals are reported
    pub fn run<W: std::io::Write>(
        &mut self,
        variant: Variant,
        reporter: &mut Reporter<W>,
    ) -> Result<SweepSummary> {
        log::info!(
            "{variant} sweep over seeds {}..={}",
            self.config.seeds.start(),
            self.config.seeds.end()
        );

        reporter.section(variant)?;

        let mut counts = Counts::default();
        let mut results = Vec::new();
        for seed in self.config.seeds.clone() {
            let result = self.run_seed(variant, seed)?;
            reporter.seed(&result)?;
            counts.record(result.verdict);
            results.push(result);
        }

        reporter.totals(variant, &counts)?;

        log::info!(
            "{variant} sweep done: {} accepted, {} rejected",
            counts.accept,
            counts.reject
        );

        Ok(SweepSummary {
            variant,
            counts,
            results,
        })
    }

    fn run_seed(&mut self, variant: Variant, seed: Seed) -> Result<SeedResult> {
        let invocation = self.config.invocation(variant, seed);
        log::debug!("running {invocation}");

        let text = self.executor.execute(&invocation)?;
        let ParsedOutput { stats, last } =
            ParsedOutput::parse(&text).map_err(|reason| Error::MalformedOutput {
                variant,
                seed,
                reason,
            })?;
        log::debug!("{variant} seed={seed} stats: {stats}");

        Ok(SeedResult {
            seed,
            verdict: Verdict::classify(&last),
            stats_line: stats,
            last_line: last,
        })
    }
}
