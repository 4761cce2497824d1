//! Time sources for stamping mock entities.
//!
//! Every timestamp Mimic hands out comes from an injected [`Clock`]. Test
//! suites use [`LogicalClock`], which stands still until it is explicitly
//! advanced, so responses are fully deterministic. [`SystemClock`] follows
//! wall time for interactive use.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::MimicError;

/// A source of "current time" for the mock services.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time as seconds since the Unix epoch.
    fn seconds(&self) -> f64;

    /// Moves the clock forward by `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::InvalidRequest`] if this clock cannot be
    /// advanced manually, or if the new time could not be represented.
    fn advance(&self, amount: Duration) -> Result<(), MimicError>;

    /// Returns the current time as a UTC date-time.
    fn now(&self) -> DateTime<Utc>;
}

/// A clock that only moves when told to. Starts at the Unix epoch.
///
/// Time is kept with millisecond resolution and never moves past
/// [`DateTime::<Utc>::MAX_UTC`].
#[derive(Debug, Default)]
pub struct LogicalClock {
    millis: AtomicU64,
}

impl LogicalClock {
    /// Creates a clock reading `0` (1970-01-01T00:00:00Z).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at `seconds` past the epoch, capped at the
    /// latest representable time.
    #[must_use]
    pub fn starting_at(seconds: u64) -> Self {
        Self {
            millis: AtomicU64::new(seconds.saturating_mul(1000).min(max_millis())),
        }
    }
}

/// Milliseconds since the epoch of [`DateTime::<Utc>::MAX_UTC`].
fn max_millis() -> u64 {
    u64::try_from(DateTime::<Utc>::MAX_UTC.timestamp_millis()).unwrap_or(u64::MAX)
}

fn datetime_from_millis(millis: u64) -> Option<DateTime<Utc>> {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

impl Clock for LogicalClock {
    #[allow(clippy::cast_precision_loss)]
    fn seconds(&self) -> f64 {
        self.millis.load(Ordering::SeqCst) as f64 / 1000.0
    }

    fn advance(&self, amount: Duration) -> Result<(), MimicError> {
        let out_of_range = || {
            MimicError::InvalidRequest(format!(
                "advancing by {} seconds would move the clock past {}",
                amount.as_secs_f64(),
                format_timestamp(&DateTime::<Utc>::MAX_UTC)
            ))
        };
        let step = u64::try_from(amount.as_millis()).map_err(|_| out_of_range())?;
        self.millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current
                    .checked_add(step)
                    .filter(|next| datetime_from_millis(*next).is_some())
            })
            .map(|_| ())
            .map_err(|_| out_of_range())
    }

    fn now(&self) -> DateTime<Utc> {
        // advance and starting_at keep the reading representable
        datetime_from_millis(self.millis.load(Ordering::SeqCst))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Wall-clock time. Cannot be advanced.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss)]
    fn seconds(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }

    fn advance(&self, _amount: Duration) -> Result<(), MimicError> {
        Err(MimicError::InvalidRequest(
            "the clock follows real time and cannot be advanced".to_string(),
        ))
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats a timestamp the way the mocked APIs render it:
/// ISO-8601, second precision, UTC, `Z` suffix.
///
/// ```
/// use chrono::DateTime;
/// use mimic::clock::format_timestamp;
///
/// let t = DateTime::from_timestamp(50, 0).unwrap_or_default();
/// assert_eq!(format_timestamp(&t), "1970-01-01T00:00:50Z");
/// ```
#[must_use]
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
