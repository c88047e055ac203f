use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calendar::WeekMarker;

/// Format an amount with exactly two decimal places, rounding half away
/// from zero (`12.5` -> `12.50`, `3.456` -> `3.46`).
pub fn format_dollar_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn group_int_digits(int_part: &str) -> String {
    // Insert commas every 3 digits.
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Dollar amount for card and list surfaces: optional thousands grouping and
/// currency symbol, sign before the symbol (`-$1,234.50`).
pub fn format_amount_display(amount: Decimal, grouping: bool, symbol: Option<&str>) -> String {
    let formatted = format_dollar_amount(amount.abs());
    let negative = amount.is_sign_negative() && formatted != "0.00";

    let body = if grouping {
        match formatted.split_once('.') {
            Some((int_part, frac)) => format!("{}.{frac}", group_int_digits(int_part)),
            None => group_int_digits(&formatted),
        }
    } else {
        formatted
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if let Some(sym) = symbol {
        out.push_str(sym);
    }
    out.push_str(&body);
    out
}

fn month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Header for a week section: "This Week", "Last Week", or `M/d - M/d`
/// spanning Sunday to Saturday.
pub fn week_label(week: WeekMarker, today: NaiveDate) -> String {
    let days = (today - week).num_days();
    if days < 7 {
        return "This Week".to_string();
    }
    if days < 14 {
        return "Last Week".to_string();
    }
    format!("{} - {}", month_day(week), month_day(week + Duration::days(6)))
}

/// Short date for a transaction row: "Today", "Yesterday", or `M/d`.
pub fn transaction_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        _ => month_day(date),
    }
}
