//! Time sources used to stamp log entries.
//!
//! The client never reads the wall clock directly. It asks a [`Clock`] so
//! callers and tests can pin the instant used for generated timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// [`Clock`] that always returns the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Format an instant as ISO-8601 UTC with microseconds and a literal `Z`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use insight_stream::clock::format_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
/// assert_eq!(format_timestamp(at), "2024-03-01T12:30:00.000000Z");
/// ```
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
