//! Heph-wait is a small library to wait for child processes, with or without
//! a deadline.
//!
//! ## About
//!
//! On Unix a child process is waited on using [`waitpid(2)`], which either
//! blocks until the process changes state or, with `WNOHANG`, returns
//! immediately. There is no way to pass a timeout. This crate builds three
//! operations on top of a single state query:
//!
//!  * [`wait`] blocks until the process changes state,
//!  * [`wait_until`] polls until the process changes state or the deadline
//!    passes,
//!  * [`wait_for`] is the same as `wait_until`, but using a timeout relative
//!    to the moment it's called.
//!
//! All three retry queries interrupted by a signal (`EINTR`) and return the
//! status word exactly as the OS reported it, see [`RawStatus`].
//!
//! [`waitpid(2)`]: https://man7.org/linux/man-pages/man2/waitpid.2.html
//! [`wait`]: wait::wait
//! [`wait_until`]: wait::wait_until
//! [`wait_for`]: wait::wait_for
//!
//! ## Errors
//!
//! The functions in the [`wait`] module return the error as a value, see
//! [`Error`], which records what operation failed and whether or not the
//! deadline had passed at the time. The methods on [`Waitable`] return an
//! [`io::Error`] instead, which can be propagated using `?`.
//!
//! [`io::Error`]: std::io::Error
//!
//! # Examples
//!
//! Waiting for a process with a timeout.
//!
//! ```no_run
//! use std::process::Command;
//! use std::time::Duration;
//!
//! use heph_wait::{ProcessHandle, WaitOutcome, Waitable};
//!
//! # fn main() -> std::io::Result<()> {
//! let child = Command::new("sleep").arg("1").spawn()?;
//! let process = ProcessHandle::from(&child);
//!
//! match process.wait_for(Duration::from_secs(2))? {
//!     WaitOutcome::Completed(status) => {
//!         println!("process stopped: {}", status.into_exit_status());
//!     }
//!     WaitOutcome::TimedOut => println!("process still running"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! This crate has one optional feature: `test`. The `test` feature will enable
//! the `test` module which contains testing facilities.

#![warn(
    anonymous_parameters,
    bare_trait_objects,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]
// Disallow warnings when running tests.
#![cfg_attr(test, deny(warnings))]
// Disallow warnings in examples, we want to set a good example after all.
#![doc(test(attr(deny(warnings))))]

/// Helper macro to execute a system call that returns an `io::Result`.
///
/// The error is read from `errno` directly after the call, before anything
/// else can overwrite it.
macro_rules! syscall {
    ($fn: ident ( $($arg: expr),* $(,)? ) ) => {{
        let res = unsafe { libc::$fn($( $arg, )*) };
        if res == -1 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(res)
        }
    }};
}

pub mod error;
pub mod poll;
pub mod process;
pub mod wait;

#[doc(no_inline)]
pub use error::{Error, ErrorKind, Operation};
#[doc(no_inline)]
pub use poll::{Mode, StateChange};
#[doc(no_inline)]
pub use process::{ProcessHandle, RawStatus, Waitable};
#[doc(no_inline)]
pub use wait::{WaitOptions, WaitOutcome};
