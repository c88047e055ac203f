//! Transactions from the backend's Plaid proxy.
//!
//! The proxy wraps Plaid's transactions endpoint: the client posts an access
//! token to `<base>/transactions` and gets back `latest_transactions`, a list
//! of Plaid transaction objects.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{join_category, EmojiTable, Transaction};
use crate::sync::TransactionSource;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/plaid";

const TRANSACTIONS_PATH: &str = "/transactions";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct TransactionsRequest<'a> {
    access_token: &'a str,
}

#[derive(Deserialize)]
struct TransactionsResponse {
    latest_transactions: Vec<Value>,
}

/// Fetches recent transactions from the backend proxy.
#[derive(Clone)]
pub struct TransactionFetcher {
    base_url: String,
    client: Client,
    emoji: EmojiTable,
    clock: Arc<dyn Clock>,
    prefer_merchant_name: bool,
}

impl Default for TransactionFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TransactionFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            emoji: EmojiTable::default(),
            clock: Arc::new(SystemClock::default()),
            prefer_merchant_name: false,
        }
    }

    pub fn with_emoji_table(mut self, emoji: EmojiTable) -> Self {
        self.emoji = emoji;
        self
    }

    /// Clock used for transactions whose date is missing or unparsable.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use Plaid's `merchant_name` as the display name when present.
    pub fn with_merchant_names(mut self, prefer: bool) -> Self {
        self.prefer_merchant_name = prefer;
        self
    }

    async fn request(&self, access_token: &str) -> anyhow::Result<TransactionsResponse> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            TRANSACTIONS_PATH
        );

        let response = self
            .client
            .post(&url)
            .json(&TransactionsRequest { access_token })
            .send()
            .await
            .context("Transaction HTTP request failed")?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .context("Failed to read transactions response body")?;

        if !status.is_success() {
            anyhow::bail!("Transactions request failed ({status}): {body_text}");
        }

        serde_json::from_str(&body_text).context("Failed to parse transactions JSON response")
    }

    /// Fetch and convert the latest transactions.
    ///
    /// Either every transaction converts or the whole fetch fails.
    pub async fn fetch_recent_transactions(&self, access_token: &str) -> Result<Vec<Transaction>> {
        let response = self.request(access_token).await.map_err(Error::fetch)?;

        let today = self.clock.today();
        let mut seen = HashSet::new();
        let mut transactions = Vec::with_capacity(response.latest_transactions.len());
        for raw in &response.latest_transactions {
            let transaction = self.convert(raw, today)?;
            if !seen.insert(transaction.id.clone()) {
                tracing::warn!(transaction_id = %transaction.id, "Duplicate transaction id in response");
            }
            transactions.push(transaction);
        }

        tracing::info!(count = transactions.len(), "Fetched recent transactions");
        Ok(transactions)
    }

    fn convert(&self, raw: &Value, today: NaiveDate) -> Result<Transaction> {
        let id = str_field(raw, "transaction_id");

        let levels: Vec<&str> = raw
            .get("category")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(|v| v.as_str().unwrap_or("")).collect())
            .unwrap_or_default();
        let [primary, secondary, ..] = levels[..] else {
            return Err(Error::CategoryFormat {
                transaction_id: id,
                found: levels.len(),
            });
        };

        let name = match raw.get("merchant_name").and_then(Value::as_str) {
            Some(merchant) if self.prefer_merchant_name && !merchant.trim().is_empty() => {
                merchant.to_string()
            }
            _ => str_field(raw, "name"),
        };

        let location = raw.get("location");
        let city = location.map(|l| str_field(l, "city")).unwrap_or_default();
        let region = location.map(|l| str_field(l, "region")).unwrap_or_default();

        Ok(Transaction {
            date: parse_date(raw, &id, today),
            amount: parse_amount(raw),
            name,
            city,
            region,
            pending: raw.get("pending").and_then(Value::as_bool).unwrap_or(false),
            category: join_category(primary, secondary),
            emoji: self.emoji.resolve(secondary).to_string(),
            id,
        })
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parse_amount(raw: &Value) -> Decimal {
    let Some(amount) = raw.get("amount").and_then(Value::as_f64) else {
        return Decimal::ZERO;
    };
    Decimal::from_str(&amount.to_string())
        .ok()
        .or_else(|| Decimal::from_f64_retain(amount))
        .unwrap_or_default()
}

/// Parse the `yyyy-MM-dd` date, falling back to `today`.
///
/// A bad date is a data-quality problem, not a fetch failure.
fn parse_date(raw: &Value, id: &str, today: NaiveDate) -> NaiveDate {
    let value = raw.get("date").and_then(Value::as_str).unwrap_or_default();
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            tracing::warn!(
                transaction_id = %id,
                date = %value,
                error = %err,
                "Unparsable transaction date; using today",
            );
            today
        }
    }
}

#[async_trait::async_trait]
impl TransactionSource for TransactionFetcher {
    fn name(&self) -> &str {
        "plaid-proxy"
    }

    async fn fetch_recent_transactions(&self, access_token: &str) -> Result<Vec<Transaction>> {
        TransactionFetcher::fetch_recent_transactions(self, access_token).await
    }
}
