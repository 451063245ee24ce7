use std::io;
use std::os::unix::process::ExitStatusExt;
use std::thread::sleep;
use std::time::{Duration, Instant};

use heph_wait::{wait, ErrorKind, Operation, ProcessHandle, Waitable};

use crate::util::{expect_exit_code, random_exit_code, spawn_never_exit, spawn_sh, SLACK};

#[test]
fn exit_code() {
    let code = random_exit_code();
    let (_child, process) = spawn_sh(&format!("exit {code}"));
    let status = wait::wait(&process).unwrap();
    expect_exit_code(status, code);
}

#[test]
fn already_exited() {
    let (_child, process) = spawn_sh("exit 3");
    // Give the process time to stop.
    sleep(Duration::from_millis(100));

    let start = Instant::now();
    let status = process.wait().unwrap();
    assert!(start.elapsed() < SLACK, "took {:?}", start.elapsed());
    expect_exit_code(status, 3);
}

#[test]
fn blocks_until_exit() {
    let (_child, process) = spawn_sh("sleep 0.1; exit 0");
    let start = Instant::now();
    let status = process.wait().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(50));
    expect_exit_code(status, 0);
}

#[test]
fn killed_by_signal() {
    let (mut child, process) = spawn_never_exit();
    child.kill().unwrap();
    let status = process.wait().unwrap().into_exit_status();
    assert_eq!(status.code(), None);
    assert_eq!(status.signal(), Some(libc::SIGKILL));
}

#[test]
fn reaped_once() {
    let (_child, process) = spawn_sh("exit 0");
    expect_exit_code(process.wait().unwrap(), 0);

    let err = wait::wait(&process).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PollFailed);
    assert_eq!(err.raw_os_error(), Some(libc::ECHILD));
}

#[test]
fn not_a_child_process() {
    let process = ProcessHandle::from_raw(std::process::id() as libc::pid_t).unwrap();
    let err = wait::wait(&process).unwrap_err();
    assert_eq!(err.operation(), Operation::Wait);
    assert_eq!(err.raw_os_error(), Some(libc::ECHILD));
    assert!(!err.deadline_passed());

    let err: io::Error = process.wait().unwrap_err();
    assert!(err.to_string().starts_with("wait: "), "got: {err}");
}

#[test]
fn only_waits_on_own_process() {
    // Neither "any child" (-1) nor a process group (0) can be waited on.
    assert!(ProcessHandle::from_raw(-1).is_none());
    assert!(ProcessHandle::from_raw(0).is_none());

    let (_child1, process1) = spawn_sh("exit 7");
    let (_child2, process2) = spawn_sh("exit 8");
    expect_exit_code(process2.wait().unwrap(), 8);
    expect_exit_code(process1.wait().unwrap(), 7);
}
