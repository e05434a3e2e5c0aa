use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Converts a UTC instant to a calendar date in the given timezone.
///
/// This is the single place where instants become schedule dates. Every
/// "today" passed into the engines is derived through it.
pub fn date_in(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    date_in(Utc::now(), tz)
}

/// Source of "today" for services.
///
/// Schedule functions take `now` explicitly; services ask a clock once per
/// operation so tests can pin the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        today_in(self.tz)
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
