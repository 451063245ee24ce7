//! Module containing the `Waitable` trait, related types and implementations.

use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};
use std::{fmt, io};

use crate::poll::Mode;
use crate::wait::{self, WaitOutcome};


/// A process that can be waited on.
///
/// The only required methods are [`id`] and [`query`], all other methods are
/// provided and build on top of `query`.
///
/// [`id`]: Waitable::id
/// [`query`]: Waitable::query
///
/// # Notes
///
/// The state of a terminated process can only be retrieved once, after which
/// the process is reaped by the OS. Once any wait method returns the status of
/// a terminated process it must not be called again. Callers must also ensure
/// only a single thread waits on the same process at a time.
pub trait Waitable {
    /// Returns the process id, used in logging.
    fn id(&self) -> u32;

    /// Query the state of the process exactly once.
    ///
    /// Returns `Ok(None)` if the process hasn't changed state, only possible
    /// when using [`Mode::NonBlocking`]. If the query fails the OS error must
    /// be captured immediately after the call, before any other call can
    /// overwrite it.
    fn query(&self, mode: Mode) -> io::Result<Option<RawStatus>>;

    /// Wait until the process changes state.
    ///
    /// See [`wait::wait`], this returns the error as an [`io::Error`]
    /// instead.
    fn wait(&self) -> io::Result<RawStatus> {
        wait::wait(self).map_err(io::Error::from)
    }

    /// Wait until the process changes state, or the `deadline` passes.
    ///
    /// See [`wait::wait_until`], this returns the error as an [`io::Error`]
    /// instead.
    fn wait_until(&self, deadline: Instant) -> io::Result<WaitOutcome> {
        wait::wait_until(self, deadline).map_err(io::Error::from)
    }

    /// Wait until the process changes state, or the `timeout` elapses.
    ///
    /// See [`wait::wait_for`], this returns the error as an [`io::Error`]
    /// instead.
    fn wait_for(&self, timeout: Duration) -> io::Result<WaitOutcome> {
        wait::wait_for(self, timeout).map_err(io::Error::from)
    }
}

/// Handle to a child process, identified by its process id.
///
/// The handle doesn't own the process, it can be freely copied. It can be
/// created from a [`Child`] or from a raw process id. The process id is always
/// positive, `waitpid(2)` interprets zero and negative ids as "any child" or
/// a process group.
///
/// # Notes
///
/// Once the process is reaped using this handle the `Child` it was created
/// from can't be waited on anymore, [`Child::wait`] will return an error.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProcessHandle {
    pid: libc::pid_t,
}

impl ProcessHandle {
    /// Create a handle from a raw process id.
    ///
    /// Returns `None` if `pid` is zero or negative.
    pub const fn from_raw(pid: libc::pid_t) -> Option<ProcessHandle> {
        if pid > 0 {
            Some(ProcessHandle { pid })
        } else {
            None
        }
    }

    /// Returns the process id.
    pub const fn pid(self) -> libc::pid_t {
        self.pid
    }
}

impl From<&Child> for ProcessHandle {
    fn from(child: &Child) -> ProcessHandle {
        // Process ids of spawned children are always positive.
        ProcessHandle {
            pid: child.id() as libc::pid_t,
        }
    }
}

impl Waitable for ProcessHandle {
    fn id(&self) -> u32 {
        self.pid as u32
    }

    fn query(&self, mode: Mode) -> io::Result<Option<RawStatus>> {
        let mut status: libc::c_int = 0;
        match syscall!(waitpid(self.pid, &mut status, mode.as_options()))? {
            // Only returned when using `WNOHANG`.
            0 => Ok(None),
            _ => Ok(Some(RawStatus::from_raw(status))),
        }
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pid.fmt(f)
    }
}

/// Status of a process as reported by the OS, e.g. by `waitpid(2)`.
///
/// This is not interpreted in any way. Use [`RawStatus::into_exit_status`] to
/// convert it into an [`ExitStatus`], which can determine the exit code or
/// the signal that stopped the process.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct RawStatus(libc::c_int);

impl RawStatus {
    /// Create a status from a raw status word.
    pub const fn from_raw(status: libc::c_int) -> RawStatus {
        RawStatus(status)
    }

    /// Returns the raw status word.
    pub const fn as_raw(self) -> libc::c_int {
        self.0
    }

    /// Convert the status into an [`ExitStatus`].
    pub fn into_exit_status(self) -> ExitStatus {
        ExitStatus::from_raw(self.0)
    }
}

impl From<RawStatus> for ExitStatus {
    fn from(status: RawStatus) -> ExitStatus {
        status.into_exit_status()
    }
}
