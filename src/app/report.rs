use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::calendar::FinancialCalendar;
use crate::classify::{classify, summarize};
use crate::config::DisplayConfig;
use crate::format::{format_amount_display, format_dollar_amount, transaction_date_label};
use crate::models::{CategoryBuckets, Transaction};
use crate::spending::week_groups;

use super::types::{
    CategoryOutput, RangeOutput, ReportOutput, TransactionOutput, WeekOutput, WeeksOutput,
};

fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn display_amount(amount: Decimal, display: &DisplayConfig) -> String {
    format_amount_display(
        amount,
        display.currency_grouping,
        display.currency_symbol.as_deref(),
    )
}

pub fn transaction_output(
    tx: &Transaction,
    today: NaiveDate,
    display: &DisplayConfig,
) -> TransactionOutput {
    TransactionOutput {
        id: tx.id.clone(),
        name: tx.name.clone(),
        amount: format_dollar_amount(tx.amount),
        amount_display: display_amount(tx.amount, display),
        date: format_ymd(tx.date),
        date_label: transaction_date_label(tx.date, today),
        pending: tx.pending,
        category: tx.category.clone(),
        emoji: tx.emoji.clone(),
        city: tx.city.clone(),
        region: tx.region.clone(),
    }
}

pub fn range_output(calendar: &FinancialCalendar, reference: NaiveDate) -> RangeOutput {
    let range = calendar.financial_month_range(reference);
    RangeOutput {
        reference: format_ymd(reference),
        start: format_ymd(range.start),
        end: format_ymd(range.end),
        weeks: range.weeks(),
    }
}

pub fn weeks_output(calendar: &FinancialCalendar, now: NaiveDateTime) -> WeeksOutput {
    WeeksOutput {
        now: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        lookback_days: calendar.lookback_days(),
        weeks: calendar
            .weeks_between(now)
            .into_iter()
            .map(format_ymd)
            .collect(),
    }
}

/// Build the budget screen: one card per bucket and the selected bucket's
/// transactions grouped by week, most recent week first.
///
/// `selected` defaults to the first bucket key.
pub fn build_report(
    transactions: &[Transaction],
    buckets: &CategoryBuckets,
    calendar: &FinancialCalendar,
    display: &DisplayConfig,
    now: NaiveDateTime,
    selected: Option<&str>,
) -> Result<ReportOutput> {
    let selected = match selected {
        Some(key) if buckets.get(key).is_some() => key.to_string(),
        Some(key) => anyhow::bail!(
            "Unknown category: {key}. Configured categories: {}",
            buckets.keys().collect::<Vec<_>>().join(", ")
        ),
        None => buckets
            .keys()
            .next()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No category buckets configured"))?,
    };

    let today = now.date();
    let classified = classify(transactions, buckets);

    let categories = summarize(&classified, buckets)
        .into_iter()
        .map(|summary| CategoryOutput {
            selected: summary.key == selected,
            total_spent: format_dollar_amount(summary.total_spent),
            total_spent_display: display_amount(summary.total_spent, display),
            key: summary.key,
            name: summary.name,
            emoji: summary.emoji,
            transaction_count: summary.transaction_count,
        })
        .collect();

    let weeks = calendar.weeks_between(now);
    let selected_transactions = classified
        .get(&selected)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let weeks = week_groups(selected_transactions, &weeks, today)
        .into_iter()
        .map(|group| WeekOutput {
            week_start: format_ymd(group.week),
            total_spent: format_dollar_amount(group.total_spent),
            total_spent_display: display_amount(group.total_spent, display),
            label: group.label,
            transactions: group
                .transactions
                .iter()
                .map(|tx| transaction_output(tx, today, display))
                .collect(),
        })
        .collect();

    Ok(ReportOutput {
        today: format_ymd(today),
        lookback_days: calendar.lookback_days(),
        selected_category: selected,
        categories,
        weeks,
    })
}
