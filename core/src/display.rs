/// Display impls for the user facing types
use crate::{Failure, Invocation, Malformed, Variant, Verdict};
use std::fmt::Display;

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad so callers can align with width specifiers, eg `{:6}`
        f.pad(match self {
            Verdict::Accept => "ACCEPT",
            Verdict::Reject => "REJECT",
        })
    }
}

impl Display for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.variant.executable_name(),
            self.graph,
            self.epsilon,
            self.degree_bound,
            self.seed
        )
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Spawn(inner) => write!(f, "could not be started: {inner}"),
            Failure::Exit(status) => match status.code() {
                Some(code) => write!(f, "exited with status {code}"),
                None => write!(f, "was terminated: {status}"),
            },
            Failure::TimedOut(timeout) => {
                write!(f, "did not finish within {:.1}s", timeout.as_secs_f64())
            }
            Failure::Io(inner) => write!(f, "output could not be collected: {inner}"),
        }
    }
}

impl Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::Empty => write!(f, "no non-blank output lines"),
            Malformed::NotUtf8 => write!(f, "output is not valid UTF-8"),
        }
    }
}
