use std::collections::HashMap;

/// Glyph shown when a secondary category has no entry in the table.
pub const DEFAULT_EMOJI: &str = "🤨";

/// Built-in glyphs keyed by the aggregator's secondary category.
const BUILTIN: &[(&str, &str)] = &[
    ("Airlines and Aviation Services", "✈️"),
    ("Car Service", "🚙"),
    ("Gas Stations", "⛽"),
    ("Parking", "🅿️"),
    ("Public Transportation Services", "🚇"),
    ("Ride Share", "🚗"),
    ("Taxi", "🚕"),
    ("Tolls and Fees", "🛣️"),
    ("Coffee Shop", "☕"),
    ("Fast Food", "🍔"),
    ("Restaurants", "🍽️"),
    ("Bar", "🍺"),
    ("Groceries", "🥦"),
    ("Supermarkets and Groceries", "🛒"),
    ("Clothing and Accessories", "👕"),
    ("Computers and Electronics", "💻"),
    ("Department Stores", "🏬"),
    ("Digital Purchase", "💾"),
    ("Bookstores", "📚"),
    ("Pharmacies", "💊"),
    ("Sporting Goods", "⚽"),
    ("Credit Card", "💳"),
    ("Debit", "💳"),
    ("Deposit", "🏦"),
    ("Payroll", "💰"),
    ("Rent", "🏠"),
    ("Utilities", "💡"),
    ("Gyms and Fitness Centers", "🏋️"),
    ("Subscription", "🔁"),
    ("Lodging", "🏨"),
];

/// Lookup from secondary category to display glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiTable {
    glyphs: HashMap<String, String>,
    default: String,
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self {
            glyphs: BUILTIN
                .iter()
                .map(|(category, glyph)| (category.to_string(), glyph.to_string()))
                .collect(),
            default: DEFAULT_EMOJI.to_string(),
        }
    }
}

impl EmojiTable {
    /// Add or replace entries on top of the current table.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.glyphs
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn resolve(&self, secondary_category: &str) -> &str {
        self.glyphs
            .get(secondary_category)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}
