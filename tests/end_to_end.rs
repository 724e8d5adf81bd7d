//! Runs the real binary: coordinator plus re-executed worker processes.

use std::path::Path;
use std::process::{Command, Output};
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_pipevisor");

fn run(dir: &Path, args: &[&str], hold_units: u32, timeout_units: u32) -> Output {
    Command::new(BIN)
        .args(args)
        .args(["--time-unit-ms", "20"])
        .args(["--hold-units", &hold_units.to_string()])
        .args(["--timeout-units", &timeout_units.to_string()])
        .args(["--tick-units", "1", "--poll-units", "1"])
        .arg("--channel-a")
        .arg(dir.join("fifo1"))
        .arg("--channel-b")
        .arg(dir.join("fifo2"))
        .arg("--log-file")
        .arg(dir.join("logs.txt"))
        .output()
        .expect("spawn pipevisor")
}

#[test]
fn larger_number_reaches_the_consumer() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["3", "7"], 2, 500);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Larger number: 7"), "stdout: {stdout}");
    assert!(stdout.contains("Counter: 4"), "stdout: {stdout}");
    assert!(
        stdout
            .trim_end()
            .ends_with("All child processes terminated. Exiting Program..."),
        "stdout: {stdout}"
    );
    assert!(!dir.path().join("fifo1").exists());
    assert!(!dir.path().join("fifo2").exists());

    let log = std::fs::read_to_string(dir.path().join("logs.txt")).unwrap();
    assert!(log.contains("producer: read numbers 3 and 7"), "log: {log}");
    assert!(log.contains("consumer: larger number is 7"), "log: {log}");
    assert!(log.contains("Channels created successfully"), "log: {log}");
}

#[test]
fn negative_inputs_and_ties() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["-5", "-5"], 1, 500);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Larger number: -5"), "stdout: {stdout}");
}

#[test]
fn timeout_cuts_the_hold_window_short() {
    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();
    // Hold is 5s, timeout is 200ms.
    let out = run(dir.path(), &["1", "2"], 250, 10);
    let elapsed = started.elapsed();
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stdout: {stdout}");
    assert!(elapsed < Duration::from_secs(4), "took {elapsed:?}");
    assert!(stdout.contains("terminated by signal 15"), "stdout: {stdout}");
    assert!(stdout.contains("Counter: 4"), "stdout: {stdout}");

    let log = std::fs::read_to_string(dir.path().join("logs.txt")).unwrap();
    assert!(log.contains("Timeout reached"), "log: {log}");
}

#[test]
fn stale_channel_files_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fifo1"), b"leftover").unwrap();
    std::fs::write(dir.path().join("fifo2"), b"leftover").unwrap();

    let out = run(dir.path(), &["10", "4"], 1, 500);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Larger number: 10"), "stdout: {stdout}");
}

#[test]
fn wrong_arguments_print_usage() {
    let cases: [&[&str]; 4] = [&["3"], &["3", "7", "9"], &["3", "seven"], &[]];
    for args in cases {
        let out = Command::new(BIN).args(args).output().unwrap();
        let stderr = String::from_utf8_lossy(&out.stderr);

        assert_eq!(out.status.code(), Some(1), "args {args:?}");
        assert!(stderr.contains("Usage:"), "stderr: {stderr}");
        assert!(stderr.contains("<int1> <int2>"), "stderr: {stderr}");
    }
}

#[test]
fn channel_creation_failure_exits_before_launching() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(BIN)
        .args(["3", "7"])
        .arg("--channel-a")
        .arg(dir.path().join("missing").join("fifo1"))
        .arg("--channel-b")
        .arg(dir.path().join("fifo2"))
        .arg("--log-file")
        .arg(dir.path().join("logs.txt"))
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1), "stderr: {stderr}");
    assert!(stderr.contains("runtime_channel_creation"), "stderr: {stderr}");
    assert!(!stdout.contains("Larger number"), "stdout: {stdout}");
    assert!(!dir.path().join("fifo2").exists());

    let log = std::fs::read_to_string(dir.path().join("logs.txt")).unwrap();
    assert!(log.contains("Failed to create channels"), "log: {log}");
    assert!(!log.contains("Channels created successfully"), "log: {log}");
}
