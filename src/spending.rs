//! Weekly spending aggregation.

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::calendar::WeekMarker;
use crate::format::week_label;
use crate::models::Transaction;

/// Transactions dated strictly inside the week starting at `week`.
///
/// Both ends are open: a transaction dated on the Sunday marker itself, or on
/// the following Sunday, is not part of this week. Sunday-dated transactions
/// therefore fall in no week at all.
pub fn transactions_in_week(transactions: &[Transaction], week: WeekMarker) -> Vec<Transaction> {
    let end_of_week = week + Duration::days(7);
    transactions
        .iter()
        .filter(|tx| tx.date > week && tx.date < end_of_week)
        .cloned()
        .collect()
}

/// Sum of amounts, rounded to cents half away from zero.
pub fn total_spent(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(|tx| tx.amount)
        .sum::<Decimal>()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One week's section of the transaction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGroup {
    pub week: WeekMarker,
    pub label: String,
    pub total_spent: Decimal,
    pub transactions: Vec<Transaction>,
}

/// Build a group per week marker, keeping the order of `weeks`.
pub fn week_groups(
    transactions: &[Transaction],
    weeks: &[WeekMarker],
    today: NaiveDate,
) -> Vec<WeekGroup> {
    weeks
        .iter()
        .map(|&week| {
            let in_week = transactions_in_week(transactions, week);
            WeekGroup {
                week,
                label: week_label(week, today),
                total_spent: total_spent(&in_week),
                transactions: in_week,
            }
        })
        .collect()
}
