//! Timeout-bounded status polling
//!
//! A wait repeatedly runs a probe until it reports the desired state, the
//! resource disappears, the deadline passes, or the cancellation token fires.
//! The result is a [`WaitOutcome`]; only probe failures are errors.

use crate::error::CloudError;
use crate::status::ResourceStatus;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Default overall wait time
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default pause between probes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Total time allowed for the wait
    pub timeout: Duration,
    /// Pause between two probes
    pub interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What the caller is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// Resource reports this status
    Status(ResourceStatus),
    /// Resource is gone; reported as [`WaitOutcome::NotFound`]
    Absent,
}

impl WaitTarget {
    pub fn is_reached_by(&self, status: ResourceStatus) -> bool {
        match self {
            WaitTarget::Status(target) => *target == status,
            WaitTarget::Absent => false,
        }
    }
}

impl From<ResourceStatus> for WaitTarget {
    fn from(status: ResourceStatus) -> Self {
        WaitTarget::Status(status)
    }
}

impl std::fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitTarget::Status(status) => write!(f, "{}", status),
            WaitTarget::Absent => write!(f, "absent"),
        }
    }
}

/// Single observation made by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Reached,
    Pending,
    Gone,
}

/// How a wait ended
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The probe reported the desired state
    Reached,
    /// The resource disappeared
    NotFound,
    /// The deadline passed first
    TimedOut,
    /// The cancellation token fired first
    Cancelled,
}

impl WaitOutcome {
    pub fn is_reached(&self) -> bool {
        matches!(self, WaitOutcome::Reached)
    }

    /// Treat anything except `Reached` as an error describing `what`
    pub fn into_result(self, what: &str) -> Result<(), CloudError> {
        match self {
            WaitOutcome::Reached => Ok(()),
            WaitOutcome::NotFound => Err(CloudError::ResourceNotFound(what.to_string())),
            WaitOutcome::TimedOut => Err(CloudError::Timeout(what.to_string())),
            WaitOutcome::Cancelled => Err(CloudError::Cancelled(what.to_string())),
        }
    }
}

/// Run `probe` until it stops reporting [`Probe::Pending`]
///
/// The first probe runs immediately. Probe errors end the wait and are
/// returned unchanged.
pub async fn poll_until<F, Fut, E>(
    config: &WaitConfig,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<WaitOutcome, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe, E>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Ok(WaitOutcome::Cancelled);
        }

        attempt += 1;
        match probe().await? {
            Probe::Reached => return Ok(WaitOutcome::Reached),
            Probe::Gone => return Ok(WaitOutcome::NotFound),
            Probe::Pending => {}
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!("Wait timed out after {} probes", attempt);
            return Ok(WaitOutcome::TimedOut);
        }

        let pause = config.interval.min(deadline - now);
        tokio::select! {
            _ = cancel.cancelled() => return Ok(WaitOutcome::Cancelled),
            _ = sleep(pause) => {}
        }
    }
}
