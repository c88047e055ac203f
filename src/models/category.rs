use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::emoji::DEFAULT_EMOJI;

/// A spending category card: the prefix used to match transaction
/// categories plus the fields shown on the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    /// Matched against the start of `Transaction::category`.
    pub prefix: String,
    /// Card title. Falls back to the prefix when not configured.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl CategoryBucket {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: None,
            emoji: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.prefix)
    }

    pub fn display_emoji(&self) -> &str {
        self.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)
    }

    /// Ordinal, case-sensitive prefix match.
    pub fn matches(&self, category: &str) -> bool {
        category.starts_with(self.prefix.as_str())
    }
}

/// Bucket key (e.g. `"food"`) to bucket definition, ordered by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryBuckets(BTreeMap<String, CategoryBucket>);

impl Default for CategoryBuckets {
    fn default() -> Self {
        Self::empty()
            .with_bucket(
                "food",
                CategoryBucket::new("Food and Drink")
                    .with_name("Food")
                    .with_emoji("🍟"),
            )
            .with_bucket(
                "shopping",
                CategoryBucket::new("Shops")
                    .with_name("Shopping")
                    .with_emoji("🛒"),
            )
            .with_bucket(
                "transportation",
                CategoryBucket::new("Travel")
                    .with_name("Transportation")
                    .with_emoji("🚗"),
            )
    }
}

impl CategoryBuckets {
    /// No buckets at all.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Buckets that only carry a prefix, from `(key, prefix)` pairs.
    pub fn from_prefixes<I, K, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, prefix)| (key.into(), CategoryBucket::new(prefix)))
                .collect(),
        )
    }

    pub fn with_bucket(mut self, key: impl Into<String>, bucket: CategoryBucket) -> Self {
        self.0.insert(key.into(), bucket);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CategoryBucket> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryBucket)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
