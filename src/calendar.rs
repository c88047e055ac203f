//! Financial month boundaries and weekly reporting buckets.
//!
//! A financial month is the calendar month snapped to whole Sunday-first
//! weeks. A partial week at either edge belongs to whichever month holds the
//! majority of its days.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Default look-back applied to "now" before resolving the financial month.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 15;

/// Longest accepted look-back; larger values are clamped.
pub const MAX_LOOKBACK_DAYS: u32 = 366;

/// The Sunday that begins a 7-day reporting window `[marker, marker + 7)`.
pub type WeekMarker = NaiveDate;

/// `[start, end)` of a financial month; both ends are Sundays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinancialMonthRange {
    pub start: WeekMarker,
    pub end: WeekMarker,
}

impl FinancialMonthRange {
    pub fn weeks(&self) -> i64 {
        (self.end - self.start).num_days() / 7
    }
}

/// Sunday-first weekday index: 1 = Sunday .. 7 = Saturday.
fn weekday_index(date: NaiveDate) -> i64 {
    date.weekday().number_from_sunday() as i64
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Compute the financial month containing `reference`.
///
/// The leading week counts toward this month only when the 1st falls on
/// Sunday..Wednesday (4+ days inside the month). The trailing week counts
/// only when the next month's 1st falls on Wednesday..Saturday.
pub fn financial_month_range(reference: NaiveDate) -> FinancialMonthRange {
    let start_of_month = first_of_month(reference);
    let w1 = weekday_index(start_of_month);
    let mut start = start_of_month - Duration::days(w1 - 1);
    if w1 > 4 {
        start += Duration::days(7);
    }

    let end_of_month = start_of_month
        .checked_add_months(Months::new(1))
        .unwrap_or(start_of_month + Duration::days(31));
    let w2 = weekday_index(end_of_month);
    let mut end = end_of_month + Duration::days((7 - w2) + 1);
    if w2 <= 3 {
        end -= Duration::days(7);
    }

    FinancialMonthRange { start, end }
}

/// Week bucketing aligned to financial months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialCalendar {
    lookback: Duration,
}

impl Default for FinancialCalendar {
    fn default() -> Self {
        Self::with_lookback_days(DEFAULT_LOOKBACK_DAYS)
    }
}

impl FinancialCalendar {
    /// Look-back of `days`, clamped to [`MAX_LOOKBACK_DAYS`].
    pub fn with_lookback_days(days: u32) -> Self {
        Self {
            lookback: Duration::days(days.min(MAX_LOOKBACK_DAYS) as i64),
        }
    }

    pub fn lookback_days(&self) -> i64 {
        self.lookback.num_days()
    }

    pub fn financial_month_range(&self, reference: NaiveDate) -> FinancialMonthRange {
        financial_month_range(reference)
    }

    /// Week markers of the financial period being reported at `now`, most
    /// recent first.
    ///
    /// `now` is shifted back by the look-back before picking the financial
    /// month, so the first days of a new month keep showing the month that
    /// just ended.
    ///
    /// A week counts only once it has started strictly before `now`. With a
    /// zero look-back and `now` exactly at midnight on the range's first
    /// Sunday, the result is empty.
    pub fn weeks_between(&self, now: NaiveDateTime) -> Vec<WeekMarker> {
        let Some(anchor) = now.checked_sub_signed(self.lookback) else {
            tracing::warn!(now = %now, "Look-back reaches before the earliest date");
            return Vec::new();
        };
        let range = financial_month_range(anchor.date());

        let mut weeks = if midnight(range.start) > anchor {
            // Anchor sits in a trailing week that belongs to the previous
            // financial month.
            let previous = anchor
                .date()
                .checked_sub_months(Months::new(1))
                .unwrap_or(anchor.date() - Duration::days(31));
            let previous_range = financial_month_range(previous);
            tracing::debug!(
                anchor = %anchor,
                start = %previous_range.start,
                end = %previous_range.end,
                "Anchor precedes financial month; using previous range"
            );
            weeks_in_range(previous_range, now)
        } else if midnight(range.end) < anchor {
            vec![range.end]
        } else {
            weeks_in_range(range, now)
        };

        weeks.sort_by(|a, b| b.cmp(a));
        weeks
    }
}

/// Every Sunday in `range` that has already started at `now`.
fn weeks_in_range(range: FinancialMonthRange, now: NaiveDateTime) -> Vec<WeekMarker> {
    let mut weeks = Vec::new();
    let mut sunday = range.start;
    while sunday < range.end && midnight(sunday) < now {
        weeks.push(sunday);
        sunday += Duration::days(7);
    }
    weeks
}
