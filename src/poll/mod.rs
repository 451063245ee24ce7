//! Querying the state of a process.
//!
//! [`poll_state`] performs a single query and is what all [wait] operations
//! are built on.
//!
//! [wait]: crate::wait

use std::io;

use log::trace;

use crate::process::{RawStatus, Waitable};


/// Mode in which to query the state of a process.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Block until the process changes state.
    Blocking,
    /// Return immediately if the process hasn't changed state (`WNOHANG`).
    NonBlocking,
}

impl Mode {
    /// Returns the options to pass to `waitpid(2)`.
    pub(crate) const fn as_options(self) -> libc::c_int {
        match self {
            Mode::Blocking => 0,
            Mode::NonBlocking => libc::WNOHANG,
        }
    }
}

/// Result of [`poll_state`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StateChange {
    /// The process hasn't changed state yet, or the query was interrupted.
    /// Either way the query should be retried.
    NoChange,
    /// The process changed state.
    Changed(RawStatus),
}

/// Query the state of `process` exactly once.
///
/// A query interrupted by a signal is reported as [`StateChange::NoChange`],
/// not as an error. Any other error is returned as is.
///
/// # Notes
///
/// If the process has terminated a [`StateChange::Changed`] result means the
/// process has been reaped, it must not be queried again.
pub fn poll_state<P>(process: &P, mode: Mode) -> io::Result<StateChange>
where
    P: Waitable + ?Sized,
{
    match process.query(mode) {
        Ok(Some(status)) => Ok(StateChange::Changed(status)),
        Ok(None) => Ok(StateChange::NoChange),
        Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {
            trace!(pid = process.id(); "process state query interrupted");
            Ok(StateChange::NoChange)
        }
        Err(err) => Err(err),
    }
}
