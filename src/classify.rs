//! Bucketing transactions into spending categories.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{CategoryBuckets, Transaction};
use crate::spending::total_spent;

/// Bucket key to the transactions whose category starts with that bucket's
/// prefix.
pub type Classified = BTreeMap<String, Vec<Transaction>>;

/// Partition `transactions` into `buckets`.
///
/// Each bucket is an independent filter: a transaction matching several
/// prefixes shows up in each of those buckets, and one matching none is left
/// out. Input order is kept within every bucket, and every bucket key is
/// present in the result even when empty.
pub fn classify(transactions: &[Transaction], buckets: &CategoryBuckets) -> Classified {
    let classified: Classified = buckets
        .iter()
        .map(|(key, bucket)| {
            let matching = transactions
                .iter()
                .filter(|tx| bucket.matches(&tx.category))
                .cloned()
                .collect();
            (key.to_string(), matching)
        })
        .collect();

    let unmatched = transactions
        .iter()
        .filter(|tx| !buckets.iter().any(|(_, b)| b.matches(&tx.category)))
        .count();
    if unmatched > 0 {
        tracing::debug!(unmatched, "Transactions matched no category bucket");
    }

    classified
}

/// Data behind one category card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub key: String,
    pub name: String,
    pub emoji: String,
    pub transaction_count: usize,
    pub total_spent: Decimal,
}

/// One summary per bucket, in bucket key order.
pub fn summarize(classified: &Classified, buckets: &CategoryBuckets) -> Vec<CategorySummary> {
    buckets
        .iter()
        .map(|(key, bucket)| {
            let transactions = classified.get(key).map(Vec::as_slice).unwrap_or(&[]);
            CategorySummary {
                key: key.to_string(),
                name: bucket.display_name().to_string(),
                emoji: bucket.display_emoji().to_string(),
                transaction_count: transactions.len(),
                total_spent: total_spent(transactions),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryBucket;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn tx(id: &str, amount: &str, primary: &str, secondary: &str) -> Transaction {
        Transaction::new(
            id,
            id,
            Decimal::from_str(amount).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 14).unwrap(),
        )
        .with_category(primary, secondary)
    }

    #[test]
    fn taxi_lands_in_transportation() {
        let buckets = CategoryBuckets::from_prefixes([("transportation", "Travel")]);
        let txns = vec![tx("a", "12.00", "Travel", "Taxi")];

        let classified = classify(&txns, &buckets);
        assert_eq!(classified["transportation"], txns);
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let buckets = CategoryBuckets::default();
        let classified = classify(&[], &buckets);
        assert_eq!(classified.len(), 3);
        assert!(classified.values().all(Vec::is_empty));
    }

    #[test]
    fn unmatched_transactions_are_dropped() {
        let buckets = CategoryBuckets::from_prefixes([("food", "Food and Drink")]);
        let txns = vec![
            tx("a", "5", "Food and Drink", "Coffee Shop"),
            tx("b", "9", "Recreation", "Arcade"),
        ];
        let classified = classify(&txns, &buckets);
        let ids: Vec<&str> = classified["food"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn overlapping_prefixes_share_transactions() {
        let buckets = CategoryBuckets::from_prefixes([("pay", "Pay"), ("payment", "Payment")]);
        let txns = vec![
            tx("a", "100", "Payment", "Credit Card"),
            tx("b", "50", "Payroll", "Deposit"),
        ];
        let classified = classify(&txns, &buckets);
        let pay: Vec<&str> = classified["pay"].iter().map(|t| t.id.as_str()).collect();
        let payment: Vec<&str> = classified["payment"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(pay, vec!["a", "b"]);
        assert_eq!(payment, vec!["a"]);
    }

    #[test]
    fn every_bucket_member_matches_its_prefix() {
        let buckets = CategoryBuckets::default();
        let txns = vec![
            tx("1", "1", "Food and Drink", "Restaurants"),
            tx("2", "2", "Shops", "Bookstores"),
            tx("3", "3", "Travel", "Parking"),
            tx("4", "4", "Food", "Groceries"),
            tx("5", "5", "travel", "Taxi"),
            tx("6", "6", "Shops", "Digital Purchase"),
        ];
        let classified = classify(&txns, &buckets);
        for (key, members) in &classified {
            let prefix = &buckets.get(key).unwrap().prefix;
            for member in members {
                assert!(member.category.starts_with(prefix.as_str()));
            }
            for other in txns.iter().filter(|t| !t.category.starts_with(prefix.as_str())) {
                assert!(!members.contains(other));
            }
        }
        let shopping: Vec<&str> = classified["shopping"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(shopping, vec!["2", "6"]);
    }

    #[test]
    fn summaries_total_each_bucket() {
        let buckets = CategoryBuckets::empty()
            .with_bucket(
                "food",
                CategoryBucket::new("Food and Drink")
                    .with_name("Food")
                    .with_emoji("🍟"),
            )
            .with_bucket("travel", CategoryBucket::new("Travel"));
        let txns = vec![
            tx("a", "10.105", "Food and Drink", "Restaurants"),
            tx("b", "2.50", "Food and Drink", "Coffee Shop"),
            tx("c", "7", "Shops", "Bookstores"),
        ];
        let summaries = summarize(&classify(&txns, &buckets), &buckets);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].key, "food");
        assert_eq!(summaries[0].name, "Food");
        assert_eq!(summaries[0].emoji, "🍟");
        assert_eq!(summaries[0].transaction_count, 2);
        assert_eq!(summaries[0].total_spent, Decimal::from_str("12.61").unwrap());
        assert_eq!(summaries[1].name, "Travel");
        assert_eq!(summaries[1].total_spent, Decimal::ZERO);
    }
}
