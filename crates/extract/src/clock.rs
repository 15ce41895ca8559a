// ABOUTME: Clock capability used to stamp extracted articles and feed build dates.
// ABOUTME: SystemClock reads wall-clock time; FixedClock returns a preset instant for tests.

use chrono::{DateTime, Utc};

/// Format used for `pubDate` and `lastBuildDate` values.
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Formats a timestamp the way RSS dates are written in generated feeds.
pub fn format_pub_date(dt: DateTime<Utc>) -> String {
    dt.format(PUB_DATE_FORMAT).to_string()
}
