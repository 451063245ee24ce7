//! Waiting for a process to change state.
//!
//! This module provides three ways to wait for a process:
//!
//! - [`wait`] blocks until the process changes state.
//! - [`wait_until`] polls the process until it changes state or the deadline
//!   passes.
//! - [`wait_for`] does the same as `wait_until`, but with a timeout relative
//!   to the moment it's called.
//!
//! By default `wait_until` and `wait_for` poll the process in a busy loop,
//! [`WaitOptions`] can be used to sleep between polls instead.
//!
//! All functions in this module return the error as a value, see [`Error`].
//! The methods on [`Waitable`] call these functions, but convert the error
//! into an [`io::Error`].
//!
//! [`io::Error`]: std::io::Error

use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::Operation;
use crate::poll::{poll_state, Mode, StateChange};
use crate::process::{RawStatus, Waitable};

#[doc(no_inline)]
pub use crate::error::{Error, ErrorKind};


/// Outcome of waiting with a deadline or timeout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[must_use = "the process' status is lost if not used"]
pub enum WaitOutcome {
    /// Process changed state before the deadline passed.
    Completed(RawStatus),
    /// Deadline passed before the process changed state.
    TimedOut,
}

impl WaitOutcome {
    /// Returns the status if the process completed.
    pub const fn status(self) -> Option<RawStatus> {
        match self {
            WaitOutcome::Completed(status) => Some(status),
            WaitOutcome::TimedOut => None,
        }
    }

    /// Returns `true` if the deadline passed.
    pub const fn is_timed_out(self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }
}

/// Options for waiting with a deadline.
///
/// # Examples
///
/// Using the default options, polling the process in a busy loop.
///
/// ```
/// use heph_wait::WaitOptions;
///
/// let opts = WaitOptions::default();
/// # _ = opts; // Silence unused variable warning.
/// ```
///
/// Sleeping for up to 10 milliseconds between polls.
///
/// ```
/// use std::time::Duration;
///
/// use heph_wait::WaitOptions;
///
/// let opts = WaitOptions::default().with_poll_interval(Duration::from_millis(10));
/// # _ = opts; // Silence unused variable warning.
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct WaitOptions {
    poll_interval: Option<Duration>,
}

impl WaitOptions {
    /// Returns the poll interval set in the options, if any.
    pub const fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }

    /// Set the time to sleep between polling the process.
    ///
    /// The sleep is never longer than the time left until the deadline, so
    /// the deadline is overshot by at most a single poll plus the scheduling
    /// latency of the OS, regardless of the interval. It does mean that a
    /// process changing state is noticed up to `interval` later.
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Same as [`wait_until`], using these options.
    pub fn wait_until<P>(&self, process: &P, deadline: Instant) -> Result<WaitOutcome, Error>
    where
        P: Waitable + ?Sized,
    {
        debug!(pid = process.id(), deadline_in_ms = millis(deadline.saturating_duration_since(Instant::now()));
            "waiting for process with deadline");
        self.poll_until(process, deadline, Operation::WaitUntil)
    }

    /// Same as [`wait_for`], using these options.
    pub fn wait_for<P>(&self, process: &P, timeout: Duration) -> Result<WaitOutcome, Error>
    where
        P: Waitable + ?Sized,
    {
        debug!(pid = process.id(), timeout_ms = millis(timeout); "waiting for process with timeout");
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.poll_until(process, deadline, Operation::WaitFor),
            // A deadline that can't be represented will never pass.
            None => blocking_wait(process, Operation::WaitFor).map(WaitOutcome::Completed),
        }
    }

    fn poll_until<P>(
        &self,
        process: &P,
        deadline: Instant,
        operation: Operation,
    ) -> Result<WaitOutcome, Error>
    where
        P: Waitable + ?Sized,
    {
        let mut polls: u64 = 0;
        let (state, timed_out) = loop {
            let state = poll_state(process, Mode::NonBlocking);
            polls += 1;
            // NOTE: the deadline check and the query are not atomic, the
            // process may change state between the two.
            let now = Instant::now();
            let timed_out = now >= deadline;
            match state {
                Ok(StateChange::NoChange) if !timed_out => {
                    if let Some(interval) = self.poll_interval {
                        sleep(interval.min(deadline.saturating_duration_since(now)));
                    }
                }
                state => break (state, timed_out),
            }
        };

        match state {
            Err(err) => {
                warn!(pid = process.id(), polls = polls, deadline_passed = timed_out;
                    "failed to query process state: {err}");
                Err(Error::poll_failed(operation, err, timed_out))
            }
            Ok(StateChange::Changed(status)) if !timed_out => {
                debug!(pid = process.id(), polls = polls, status = status.as_raw(); "process changed state");
                Ok(WaitOutcome::Completed(status))
            }
            Ok(StateChange::Changed(status)) => {
                // The process changed state in the same iteration the
                // deadline passed, the status is dropped.
                debug!(pid = process.id(), polls = polls, status = status.as_raw();
                    "deadline passed waiting for process, discarding status");
                Ok(WaitOutcome::TimedOut)
            }
            Ok(StateChange::NoChange) => {
                debug!(pid = process.id(), polls = polls; "deadline passed waiting for process");
                Ok(WaitOutcome::TimedOut)
            }
        }
    }
}

/// Wait until `process` changes state.
///
/// This blocks the current thread, potentially forever if the process never
/// stops. Queries interrupted by a signal are retried.
///
/// # Notes
///
/// Returns the status of the process as is, use
/// [`RawStatus::into_exit_status`] to interpret it.
pub fn wait<P>(process: &P) -> Result<RawStatus, Error>
where
    P: Waitable + ?Sized,
{
    debug!(pid = process.id(); "waiting for process");
    blocking_wait(process, Operation::Wait)
}

/// Wait until `process` changes state or `deadline` passes.
///
/// This polls the process in a busy loop, use [`WaitOptions`] to sleep
/// between polls.
///
/// # Notes
///
/// Polling the process and checking the deadline are two separate steps. If
/// the process changes state in the same iteration in which the deadline
/// passes this returns [`WaitOutcome::TimedOut`] and the status is lost, as
/// the process is already reaped at that point.
///
/// If an error is returned [`Error::deadline_passed`] can be used to
/// determine if the deadline had passed at the time.
pub fn wait_until<P>(process: &P, deadline: Instant) -> Result<WaitOutcome, Error>
where
    P: Waitable + ?Sized,
{
    WaitOptions::default().wait_until(process, deadline)
}

/// Wait until `process` changes state or `timeout` elapses.
///
/// The deadline is determined once, when this function is called. Other than
/// that this is the same as [`wait_until`].
pub fn wait_for<P>(process: &P, timeout: Duration) -> Result<WaitOutcome, Error>
where
    P: Waitable + ?Sized,
{
    WaitOptions::default().wait_for(process, timeout)
}

/// Returns `duration` in milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn blocking_wait<P>(process: &P, operation: Operation) -> Result<RawStatus, Error>
where
    P: Waitable + ?Sized,
{
    loop {
        match poll_state(process, Mode::Blocking) {
            Ok(StateChange::NoChange) => continue,
            Ok(StateChange::Changed(status)) => {
                debug!(pid = process.id(), status = status.as_raw(); "process changed state");
                return Ok(status);
            }
            Err(err) => {
                warn!(pid = process.id(); "failed to query process state: {err}");
                return Err(Error::poll_failed(operation, err, false));
            }
        }
    }
}
