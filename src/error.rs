//! Module containing the error types.

use std::{fmt, io};

/// Error returned by the functions in the [`wait`] module.
///
/// The error can be converted into an [`io::Error`], which is what the methods
/// on [`Waitable`] do. The returned `io::Error` will have the same
/// [`io::ErrorKind`] as the underlying OS error and contains this `Error`,
/// which can be retrieved using [`io::Error::get_ref`] and downcasting.
///
/// [`wait`]: crate::wait
/// [`Waitable`]: crate::Waitable
pub struct Error {
    operation: Operation,
    kind: ErrorKind,
    /// Underlying error returned by [`Waitable::query`].
    ///
    /// [`Waitable::query`]: crate::Waitable::query
    err: io::Error,
    deadline_passed: bool,
}

/// Kind of [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Querying the process' state failed for a reason other than being
    /// interrupted. The OS error code is available via
    /// [`Error::raw_os_error`].
    PollFailed,
}

/// The operation that returned an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    /// [`wait::wait`](crate::wait::wait).
    Wait,
    /// [`wait::wait_until`](crate::wait::wait_until).
    WaitUntil,
    /// [`wait::wait_for`](crate::wait::wait_for).
    WaitFor,
}

impl Operation {
    /// Returns the label of the operation, e.g. `wait_until`.
    pub const fn label(self) -> &'static str {
        match self {
            Operation::Wait => "wait",
            Operation::WaitUntil => "wait_until",
            Operation::WaitFor => "wait_for",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Error {
    pub(crate) const fn poll_failed(
        operation: Operation,
        err: io::Error,
        deadline_passed: bool,
    ) -> Error {
        Error {
            operation,
            kind: ErrorKind::PollFailed,
            err,
            deadline_passed,
        }
    }

    /// Returns the kind of error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the operation that failed.
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the OS error code, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.err.raw_os_error()
    }

    /// Returns `true` if the deadline had already passed when the error
    /// occurred.
    ///
    /// Always `false` for [`Operation::Wait`], as it doesn't have a deadline.
    pub const fn deadline_passed(&self) -> bool {
        self.deadline_passed
    }

    /// Returns the underlying I/O error.
    pub fn into_inner(self) -> io::Error {
        self.err
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(err.err.kind(), err)
    }
}

/// We implement [`Debug`] by using [`Display`] implementation because the
/// [`Termination`] trait uses `Debug` rather then `Display` when returning an
/// `Result`.
///
/// [`Termination`]: std::process::Termination
/// [`Debug`]: std::fmt::Debug
/// [`Display`]: std::fmt::Display
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DESC: &str = "failed to query process state";
        let op = self.operation;
        let err = &self.err;
        match self.kind {
            ErrorKind::PollFailed if self.deadline_passed => {
                write!(f, "{op}: {DESC} (deadline passed): {err}")
            }
            ErrorKind::PollFailed => write!(f, "{op}: {DESC}: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
