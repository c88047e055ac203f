use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Abstraction over the current wall-clock moment so calendar math is
/// deterministic in tests.
///
/// Week markers and transaction dates are plain calendar days, so the clock
/// hands out naive local time rather than a UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the system clock in the machine's local timezone, or in an explicit
/// IANA timezone when one is configured.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    timezone: Option<Tz>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_timezone(timezone: Tz) -> Self {
        Self {
            timezone: Some(timezone),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => chrono::Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Noon on `date`, far enough from midnight that day-boundary comparisons
    /// behave like they would for a user checking the app mid-day.
    pub fn at_noon(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
