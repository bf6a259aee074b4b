//! Bounded, cancellable polling used by `wait_for`
//!
//! Pure loop logic, kept free of HTTP so it can be tested on its own.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Cancels an in-flight `wait_for` from another thread.
///
/// Clones share the same flag. Cancelling wakes a sleeping waiter
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for up to `duration`; returns true if cancelled meanwhile
    fn sleep(&self, duration: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(|e| e.into_inner());
        let (cancelled, _) = condvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(|e| e.into_inner());
        *cancelled
    }
}

/// How long and how often `wait_for` polls
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Give up with `Error::Timeout` after this long
    pub timeout: Duration,
    /// Delay before the second poll
    pub poll_interval: Duration,
    /// Delay doubles after each empty poll up to this cap
    pub max_poll_interval: Duration,
    /// Only accept emails received at or after this instant.
    /// `None` means the moment the wait starts, less `lookback`.
    pub received_after: Option<DateTime<Utc>>,
    /// Allowance for emails accepted just before the wait starts, such as
    /// one sent immediately beforehand or stamped by a skewed clock
    pub lookback: Duration,
    pub cancel: Option<CancellationToken>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            max_poll_interval: Duration::from_secs(5),
            received_after: None,
            lookback: Duration::from_secs(30),
            cancel: None,
        }
    }
}

impl WaitOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn max_poll_interval(mut self, interval: Duration) -> Self {
        self.max_poll_interval = interval;
        self
    }

    pub fn received_after(mut self, since: DateTime<Utc>) -> Self {
        self.received_after = Some(since);
        self
    }

    pub fn lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Earliest `received` time a match may have, for a wait starting at `now`
    pub(crate) fn baseline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.received_after.unwrap_or_else(|| {
            chrono::Duration::from_std(self.lookback)
                .ok()
                .and_then(|lookback| now.checked_sub_signed(lookback))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        })
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns true if cancelled during the sleep
    fn sleep(&self, duration: Duration) -> bool {
        match &self.cancel {
            Some(token) => token.sleep(duration),
            None => {
                std::thread::sleep(duration);
                false
            }
        }
    }
}

/// Call `probe` until it yields a value, the deadline passes, or the wait
/// is cancelled. Errors from `probe` end the wait immediately.
///
/// A timeout too large to represent as an `Instant` means no deadline.
pub(crate) fn poll_until<T, F>(options: &WaitOptions, mut probe: F) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    let started = Instant::now();
    let deadline = started.checked_add(options.timeout);
    let max_delay = options.max_poll_interval.max(options.poll_interval);
    let mut delay = options.poll_interval;
    let mut attempts: u32 = 0;

    loop {
        if options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        attempts += 1;
        if let Some(found) = probe()? {
            log::debug!("Wait satisfied after {} poll(s)", attempts);
            return Ok(found);
        }

        let now = Instant::now();
        let sleep_for = match deadline {
            Some(deadline) if now >= deadline => {
                log::debug!("Wait timed out after {} poll(s)", attempts);
                return Err(Error::Timeout {
                    waited: now - started,
                });
            }
            Some(deadline) => delay.min(deadline - now),
            None => delay,
        };

        if options.sleep(sleep_for) {
            return Err(Error::Cancelled);
        }
        delay = delay.saturating_mul(2).min(max_delay);
    }
}
