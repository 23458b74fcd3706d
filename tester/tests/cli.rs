// Runs the built binary against fake testers. The fakes are shell scripts passed as the GRAPH
// argument to `/bin/sh`, which then sees `<eps> <d> <seed>` as `$1 $2 $3`.
#![cfg(unix)]

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_slgraph-sweep");

fn script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn sweep(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(["--color", "never", "--quiet"])
        .args(args)
        .output()
        .unwrap()
}

const ODD_SEEDS_REJECT: &str = r#"
echo "Stats: nodes=10 edges=12 eps=$1 d=$2"
if [ $(( $3 % 2 )) -eq 1 ]; then
    echo "REJECT (v=$3, cause=fwd)"
else
    echo "ACCEPT (m=4, L=9)"
fi
"#;

#[test]
fn sweeps_both_testers() {
    let fake = script(ODD_SEEDS_REJECT);
    let graph = fake.path().to_str().unwrap();

    let output = sweep(&[
        "--basic", "/bin/sh", "--improved", "/bin/sh", graph, "0.1", "9", "1", "3",
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        format!(
            "GRAPH={graph}  eps=0.1  d=9  seeds=1..3\n\
             \n\
             BASIC TESTER\n\
             seed= 1  REJECT  REJECT (v=1, cause=fwd)\n\
             seed= 2  ACCEPT  ACCEPT (m=4, L=9)\n\
             seed= 3  REJECT  REJECT (v=3, cause=fwd)\n\
             BASIC TOTAL: ACCEPT=1, REJECT=2\n\
             \n\
             IMPROVED TESTER\n\
             seed= 1  REJECT  REJECT (v=1, cause=fwd)\n\
             seed= 2  ACCEPT  ACCEPT (m=4, L=9)\n\
             seed= 3  REJECT  REJECT (v=3, cause=fwd)\n\
             IMPROVED TOTAL: ACCEPT=1, REJECT=2\n\
             \n\
             AGREEMENT: 3/3 seeds\n"
        )
    );
}

#[test]
fn show_stats_echoes_first_line() {
    let fake = script(ODD_SEEDS_REJECT);
    let graph = fake.path().to_str().unwrap();

    let output = sweep(&[
        "--basic", "/bin/sh", "--improved", "/bin/sh", "--show-stats", graph, "0.3", "4", "2", "2",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(
        "seed= 2  ACCEPT  ACCEPT (m=4, L=9)\n  stats: Stats: nodes=10 edges=12 eps=0.3 d=4\n"
    ));
}

#[test]
fn missing_tester_fails_before_its_totals() {
    let fake = script(ODD_SEEDS_REJECT);
    let graph = fake.path().to_str().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("slgraph_tester_improved");

    let output = sweep(&[
        "--basic",
        "/bin/sh",
        "--improved",
        missing.to_str().unwrap(),
        graph,
        "0.1",
        "9",
        "1",
        "2",
    ]);

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("BASIC TOTAL: ACCEPT=1, REJECT=1\n"));
    assert!(stdout.ends_with("IMPROVED TESTER\n"));
    assert!(!stdout.contains("IMPROVED TOTAL"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("improved sweep aborted"));
}

#[test]
fn failing_tester_aborts_the_run() {
    let fake = script("echo 'Failed to open graph' >&2\nexit 1\n");
    let graph = fake.path().to_str().unwrap();

    let output = sweep(&["--basic", "/bin/sh", "--improved", "/bin/sh", graph]);

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("TOTAL"));
    assert!(!stdout.contains("seed="));
}

#[test]
fn silent_tester_is_malformed() {
    let fake = script("echo\necho '   '\n");
    let graph = fake.path().to_str().unwrap();

    let output = sweep(&[
        "--basic", "/bin/sh", "--improved", "/bin/sh", graph, "0.1", "9", "1", "1",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no non-blank output lines"));
}

#[test]
fn non_integer_seed_fails_before_any_sweep() {
    let output = sweep(&["g.slg", "0.1", "9", "first"]);

    assert!(!output.status.success());
    assert_eq!(output.stdout, b"");
}

#[test]
fn empty_seed_range_reports_zero_totals() {
    let output = sweep(&["--tester-dir", "/nonexistent", "g.slg", "0.1", "9", "5", "4"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "GRAPH=g.slg  eps=0.1  d=9  seeds=5..4\n\
         \n\
         BASIC TESTER\n\
         BASIC TOTAL: ACCEPT=0, REJECT=0\n\
         \n\
         IMPROVED TESTER\n\
         IMPROVED TOTAL: ACCEPT=0, REJECT=0\n\
         \n\
         AGREEMENT: 0/0 seeds\n"
    );
}
