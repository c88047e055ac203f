pub mod plaid;

pub use plaid::TransactionFetcher;

use crate::error::Result;
use crate::models::Transaction;

/// Anything that can produce the user's recent transactions.
#[async_trait::async_trait]
pub trait TransactionSource: Send + Sync {
    /// Human-readable name for this source
    fn name(&self) -> &str;

    async fn fetch_recent_transactions(&self, access_token: &str) -> Result<Vec<Transaction>>;
}

/// Holds the most recent fetch result for the views.
///
/// Each successful refresh replaces the stored collection wholesale; a
/// failed one leaves it as it was. Refreshing takes `&mut self`, so one feed
/// never has two fetches in flight.
pub struct TransactionFeed<S> {
    source: S,
    transactions: Vec<Transaction>,
}

impl<S: TransactionSource> TransactionFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            transactions: Vec::new(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Fetch, store, then call `on_complete` exactly once.
    ///
    /// `on_complete` runs after the new collection is stored on success and
    /// also runs on failure, before the error is returned.
    pub async fn refresh<F>(&mut self, access_token: &str, on_complete: F) -> Result<&[Transaction]>
    where
        F: FnOnce(),
    {
        let outcome = self.source.fetch_recent_transactions(access_token).await;
        let outcome = match outcome {
            Ok(transactions) => {
                self.transactions = transactions;
                Ok(())
            }
            Err(err) => {
                tracing::error!(source = self.source.name(), error = %err, "Transaction refresh failed");
                Err(err)
            }
        };
        on_complete();
        outcome.map(|()| self.transactions.as_slice())
    }
}
