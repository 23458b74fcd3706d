mod display;
mod invoker;
mod output;
mod report;
mod sweep;

pub use invoker::{Executor, Failure, Invocation, ProcessExecutor, TesterPaths};
pub use output::{Malformed, ParsedOutput};
pub use report::{ReportOptions, Reporter};
pub use sweep::{Agreement, Counts, SeedResult, Sweep, SweepSummary};

/*****************************************************************************************
 * Error Types
 */

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The tester could not be run to a successful completion
    ProcessFailure {
        variant: Variant,
        seed: Seed,
        program: std::path::PathBuf,
        reason: Failure,
    },
    /// The tester completed but its output can't be used
    MalformedOutput {
        variant: Variant,
        seed: Seed,
        reason: Malformed,
    },
    IOError(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ProcessFailure {
                variant,
                seed,
                program,
                reason,
            } => {
                write!(
                    f,
                    "{variant} tester {} failed for seed {seed}: {reason}",
                    program.display()
                )
            }
            Error::MalformedOutput {
                variant,
                seed,
                reason,
            } => {
                write!(f, "{variant} tester output for seed {seed} is unusable: {reason}")
            }
            Error::IOError(inner) => {
                write!(f, "IOError: {inner}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProcessFailure { reason, .. } => reason.source(),
            Error::MalformedOutput { .. } => None,
            Error::IOError(inner) => Some(inner),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(inner: std::io::Error) -> Self {
        Self::IOError(inner)
    }
}

/*****************************************************************************************
 * Common Types / Constants
 */

pub type Seed = u64;

pub const DEFAULT_GRAPH: &str = "bamberg.slg";
pub const DEFAULT_EPSILON: &str = "0.1";
pub const DEFAULT_DEGREE_BOUND: &str = "9";
pub const DEFAULT_SEED_START: Seed = 1;
pub const DEFAULT_SEED_END: Seed = 20;

/// The two implementations of the tester contract being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Basic,
    Improved,
}

impl Variant {
    /// Sweep order
    pub const ALL: [Variant; 2] = [Variant::Basic, Variant::Improved];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Improved => "improved",
        }
    }

    /// Name of the tester executable inside the tester directory
    pub fn executable_name(self) -> &'static str {
        match self {
            Variant::Basic => "slgraph_tester_basic",
            Variant::Improved => "slgraph_tester_improved",
        }
    }
}

/// Outcome of a single tester run, derived from its final output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub const ACCEPT_PREFIX: &'static str = "ACCEPT";

    /// Anything that doesn't start with the exact `ACCEPT` prefix counts as a rejection, including
    /// garbage and error messages.
    pub fn classify(last_line: &str) -> Self {
        if last_line.starts_with(Self::ACCEPT_PREFIX) {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

/// Parameters shared by every invocation of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub graph: String,
    /// Passed through verbatim, never parsed
    pub epsilon: String,
    /// Passed through verbatim, never parsed
    pub degree_bound: String,
    pub seeds: std::ops::RangeInclusive<Seed>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            graph: DEFAULT_GRAPH.into(),
            epsilon: DEFAULT_EPSILON.into(),
            degree_bound: DEFAULT_DEGREE_BOUND.into(),
            seeds: DEFAULT_SEED_START..=DEFAULT_SEED_END,
        }
    }
}

impl RunConfig {
    pub fn invocation(&self, variant: Variant, seed: Seed) -> Invocation<'_> {
        Invocation {
            variant,
            graph: &self.graph,
            epsilon: &self.epsilon,
            degree_bound: &self.degree_bound,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ACCEPT" => Verdict::Accept)]
    #[test_case("ACCEPT (prob=0.9)" => Verdict::Accept)]
    #[test_case("ACCEPT (m=12, L=40)" => Verdict::Accept)]
    #[test_case("REJECT: found violation" => Verdict::Reject)]
    #[test_case("REJECT (v=3, cause=fwd, fwd=2, rev=7, L=40)" => Verdict::Reject)]
    #[test_case("acceptable" => Verdict::Reject)]
    #[test_case("accept" => Verdict::Reject)]
    #[test_case("ACCEP" => Verdict::Reject)]
    #[test_case("NOT ACCEPT" => Verdict::Reject)]
    #[test_case("Segmentation fault" => Verdict::Reject)]
    fn classify(line: &str) -> Verdict {
        Verdict::classify(line)
    }

    #[test]
    fn default_config() {
        let config = RunConfig::default();

        pretty_assertions::assert_eq!(config.graph, "bamberg.slg");
        pretty_assertions::assert_eq!(config.epsilon, "0.1");
        pretty_assertions::assert_eq!(config.degree_bound, "9");
        pretty_assertions::assert_eq!(config.seeds, 1..=20);
    }

    #[test]
    fn invocation_carries_config() {
        let config = RunConfig {
            graph: "g.slg".into(),
            epsilon: "0.25".into(),
            degree_bound: "4".into(),
            seeds: 1..=3,
        };

        let invocation = config.invocation(Variant::Improved, 2);

        pretty_assertions::assert_eq!(invocation.variant, Variant::Improved);
        pretty_assertions::assert_eq!(invocation.args(), ["g.slg", "0.25", "4", "2"]);
    }

    #[test]
    fn error_display() {
        let err = Error::MalformedOutput {
            variant: Variant::Basic,
            seed: 7,
            reason: Malformed::Empty,
        };

        pretty_assertions::assert_eq!(
            err.to_string(),
            "basic tester output for seed 7 is unusable: no non-blank output lines"
        );
    }
}
