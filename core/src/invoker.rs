use crate::{Error, Malformed, Result, Seed, Variant};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One run of a tester: the variant plus the four positional arguments it is launched with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub variant: Variant,
    pub graph: &'a str,
    pub epsilon: &'a str,
    pub degree_bound: &'a str,
    pub seed: Seed,
}

impl Invocation<'_> {
    /// `<graph> <epsilon> <degree-bound> <seed>`, in that order
    pub fn args(&self) -> [String; 4] {
        [
            self.graph.to_owned(),
            self.epsilon.to_owned(),
            self.degree_bound.to_owned(),
            self.seed.to_string(),
        ]
    }
}

/// Runs a tester and returns everything it wrote to stdout
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation<'_>) -> Result<String>;
}

impl<F> Executor for F
where
    F: FnMut(&Invocation<'_>) -> Result<String>,
{
    fn execute(&mut self, invocation: &Invocation<'_>) -> Result<String> {
        self(invocation)
    }
}

/// Why a tester process didn't complete successfully
#[derive(Debug)]
pub enum Failure {
    Spawn(std::io::Error),
    Exit(std::process::ExitStatus),
    TimedOut(Duration),
    Io(std::io::Error),
}

impl Failure {
    pub(crate) fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Failure::Spawn(inner) | Failure::Io(inner) => Some(inner),
            Failure::Exit(_) | Failure::TimedOut(_) => None,
        }
    }
}

/// Locations of the tester executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterPaths {
    pub basic: PathBuf,
    pub improved: PathBuf,
}

impl TesterPaths {
    pub const DEFAULT_DIR: &'static str = "test";

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            basic: dir.join(Variant::Basic.executable_name()),
            improved: dir.join(Variant::Improved.executable_name()),
        }
    }

    pub fn get(&self, variant: Variant) -> &Path {
        match variant {
            Variant::Basic => &self.basic,
            Variant::Improved => &self.improved,
        }
    }
}

impl Default for TesterPaths {
    fn default() -> Self {
        Self::in_dir(Self::DEFAULT_DIR)
    }
}

/// Runs the testers as external processes
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    paths: TesterPaths,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(paths: TesterPaths) -> Self {
        Self {
            paths,
            timeout: None,
        }
    }

    /// Kill a tester that hasn't finished after `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn run(
        &self,
        program: &Path,
        invocation: &Invocation<'_>,
    ) -> std::result::Result<Vec<u8>, Failure> {
        use std::io::{BufRead, Read};
        use std::process::{Command, Stdio};
        use std::sync::mpsc;

        let args = invocation.args();
        log::debug!("launching {} {}", program.display(), args.join(" "));

        let started = Instant::now();
        let mut proc = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Failure::Spawn)?;

        let (Some(mut stdout), Some(stderr)) = (proc.stdout.take(), proc.stderr.take()) else {
            kill_and_reap(&mut proc);
            return Err(Failure::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "tester pipes were not captured",
            )));
        };

        // drain stdout off-thread so the wait below can be bounded
        let (sender, receiver) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            let res = stdout.read_to_end(&mut buffer).map(|_| buffer);
            // the receiver is gone if the tester timed out
            let _ = sender.send(res);
        });

        // pass stderr through the log, a line at a time, so it doesn't interleave with the report
        let variant = invocation.variant;
        let seed = invocation.seed;
        let stderr = std::io::BufReader::new(stderr);
        let (stderr_sender, stderr_done) = mpsc::channel();
        std::thread::spawn(move || {
            for line in stderr.lines().map_while(std::result::Result::ok) {
                log::warn!("[{variant} seed={seed}] {line}");
            }
            let _ = stderr_sender.send(());
        });

        // one deadline covers the whole invocation: stdout, exit and stderr
        let remaining = |timeout: Duration| timeout.saturating_sub(started.elapsed());

        let received = match self.timeout {
            Some(timeout) => receiver
                .recv_timeout(remaining(timeout))
                .map_err(|err| match err {
                    mpsc::RecvTimeoutError::Timeout => Failure::TimedOut(timeout),
                    mpsc::RecvTimeoutError::Disconnected => disconnected(),
                }),
            None => receiver.recv().map_err(|_| disconnected()),
        };

        let output = match received {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                kill_and_reap(&mut proc);
                return Err(Failure::Io(err));
            }
            Err(failure) => {
                kill_and_reap(&mut proc);
                return Err(failure);
            }
        };

        // stdout can close well before the tester exits
        let status = match self.timeout {
            Some(timeout) => loop {
                match proc.try_wait() {
                    Ok(Some(status)) => break status,
                    Ok(None) if started.elapsed() >= timeout => {
                        kill_and_reap(&mut proc);
                        return Err(Failure::TimedOut(timeout));
                    }
                    Ok(None) => std::thread::sleep(POLL_INTERVAL.min(remaining(timeout))),
                    Err(err) => {
                        kill_and_reap(&mut proc);
                        return Err(Failure::Io(err));
                    }
                }
            },
            None => proc.wait().map_err(Failure::Io)?,
        };

        // a leftover grandchild can hold stderr open after the tester exits, past the deadline
        // the forwarding thread is left to finish on its own
        match self.timeout {
            Some(timeout) => {
                if let Err(mpsc::RecvTimeoutError::Timeout) =
                    stderr_done.recv_timeout(remaining(timeout))
                {
                    return Err(Failure::TimedOut(timeout));
                }
            }
            None => {
                let _ = stderr_done.recv();
            }
        }

        if !status.success() {
            return Err(Failure::Exit(status));
        }

        log::trace!("{variant} seed={seed} stdout: {:?}", String::from_utf8_lossy(&output));

        Ok(output)
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// if killing fails the child has already exited, reaping it is all that's left
fn kill_and_reap(proc: &mut std::process::Child) {
    let _ = proc.kill();
    let _ = proc.wait();
}

fn disconnected() -> Failure {
    Failure::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "stdout reader stopped unexpectedly",
    ))
}

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation<'_>) -> Result<String> {
        let program = self.paths.get(invocation.variant);

        let output = self
            .run(program, invocation)
            .map_err(|reason| Error::ProcessFailure {
                variant: invocation.variant,
                seed: invocation.seed,
                program: program.to_path_buf(),
                reason,
            })?;

        String::from_utf8(output).map_err(|_| Error::MalformedOutput {
            variant: invocation.variant,
            seed: invocation.seed,
            reason: Malformed::NotUtf8,
        })
    }
}
