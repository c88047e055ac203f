use serde::Serialize;

/// JSON output for transactions
#[derive(Debug, Serialize)]
pub struct TransactionOutput {
    pub id: String,
    pub name: String,
    pub amount: String,
    pub amount_display: String,
    pub date: String,
    pub date_label: String,
    pub pending: bool,
    pub category: String,
    pub emoji: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
}

/// JSON output for a category card
#[derive(Debug, Serialize)]
pub struct CategoryOutput {
    pub key: String,
    pub name: String,
    pub emoji: String,
    pub transaction_count: usize,
    pub total_spent: String,
    pub total_spent_display: String,
    pub selected: bool,
}

/// JSON output for one week section
#[derive(Debug, Serialize)]
pub struct WeekOutput {
    pub week_start: String,
    pub label: String,
    pub total_spent: String,
    pub total_spent_display: String,
    pub transactions: Vec<TransactionOutput>,
}

/// JSON output for a financial month range
#[derive(Debug, Serialize)]
pub struct RangeOutput {
    pub reference: String,
    pub start: String,
    pub end: String,
    pub weeks: i64,
}

/// JSON output for the week markers shown at a moment
#[derive(Debug, Serialize)]
pub struct WeeksOutput {
    pub now: String,
    pub lookback_days: i64,
    pub weeks: Vec<String>,
}

/// JSON output for the full budget screen
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub today: String,
    pub lookback_days: i64,
    pub selected_category: String,
    pub categories: Vec<CategoryOutput>,
    pub weeks: Vec<WeekOutput>,
}
