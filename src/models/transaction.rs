use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Separator between the primary and secondary category levels.
pub const CATEGORY_SEPARATOR: &str = " - ";

/// A single card transaction as shown in the budgeting views.
///
/// Built fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier from the aggregator (`transaction_id`).
    pub id: String,
    /// Display label.
    pub name: String,
    /// Signed amount in the currency's major unit.
    pub amount: Decimal,
    /// Authorization day of the purchase.
    pub date: NaiveDate,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub pending: bool,
    /// `"<primary> - <secondary>"`.
    pub category: String,
    pub emoji: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            date,
            city: String::new(),
            region: String::new(),
            pending: false,
            category: CATEGORY_SEPARATOR.to_string(),
            emoji: String::new(),
        }
    }

    pub fn with_category(mut self, primary: &str, secondary: &str) -> Self {
        self.category = join_category(primary, secondary);
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_location(mut self, city: impl Into<String>, region: impl Into<String>) -> Self {
        self.city = city.into();
        self.region = region.into();
        self
    }

    /// The primary category level (text before the first separator).
    pub fn primary_category(&self) -> &str {
        self.category
            .split_once(CATEGORY_SEPARATOR)
            .map(|(primary, _)| primary)
            .unwrap_or(&self.category)
    }

    /// The secondary category level (text after the first separator).
    pub fn secondary_category(&self) -> &str {
        self.category
            .split_once(CATEGORY_SEPARATOR)
            .map(|(_, secondary)| secondary)
            .unwrap_or("")
    }
}

pub fn join_category(primary: &str, secondary: &str) -> String {
    format!("{primary}{CATEGORY_SEPARATOR}{secondary}")
}
