use std::io;
use std::time::{Duration, Instant};

use heph_wait::{wait, Operation, ProcessHandle, WaitOptions, WaitOutcome, Waitable};

use crate::util::{
    assert_near_deadline, expect_completed, expect_exit_code, kill, random_exit_code,
    spawn_never_exit, spawn_sh,
};

#[test]
fn timed_out_then_completed() {
    // Process stops after ~50 milliseconds.
    let (_child, process) = spawn_sh("sleep 0.05; exit 0");

    let deadline = Instant::now() + Duration::from_millis(10);
    let outcome = wait::wait_until(&process, deadline).unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);

    let deadline = Instant::now() + Duration::from_millis(200);
    let status = expect_completed(wait::wait_until(&process, deadline));
    expect_exit_code(status, 0);
}

#[test]
fn never_exits() {
    let (mut child, process) = spawn_never_exit();
    let deadline = Instant::now() + Duration::from_millis(100);
    let outcome = process.wait_until(deadline).unwrap();
    assert_near_deadline(Instant::now(), deadline);
    assert_eq!(outcome, WaitOutcome::TimedOut);
    kill(&mut child, process);
}

#[test]
fn exits_before_deadline() {
    let code = random_exit_code();
    let (_child, process) = spawn_sh(&format!("sleep 0.05; exit {code}"));
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = expect_completed(process.wait_until(deadline));
    assert!(Instant::now() < deadline);
    expect_exit_code(status, code);
}

#[test]
fn with_poll_interval() {
    let opts = WaitOptions::default().with_poll_interval(Duration::from_millis(5));

    let (mut child, process) = spawn_never_exit();
    let deadline = Instant::now() + Duration::from_millis(50);
    let outcome = opts.wait_until(&process, deadline).unwrap();
    assert_near_deadline(Instant::now(), deadline);
    assert_eq!(outcome, WaitOutcome::TimedOut);
    kill(&mut child, process);

    let (_child, process) = spawn_sh("sleep 0.05; exit 2");
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = expect_completed(opts.wait_until(&process, deadline));
    expect_exit_code(status, 2);
}

#[test]
fn not_a_child_process() {
    let process = ProcessHandle::from_raw(std::process::id() as libc::pid_t).unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    let err = wait::wait_until(&process, deadline).unwrap_err();
    assert_eq!(err.operation(), Operation::WaitUntil);
    assert_eq!(err.raw_os_error(), Some(libc::ECHILD));
    assert!(!err.deadline_passed());

    let err: io::Error = process.wait_until(deadline).unwrap_err();
    assert!(err.to_string().starts_with("wait_until: "), "got: {err}");
}
