mod category;
mod emoji;
mod transaction;

pub use category::{CategoryBucket, CategoryBuckets};
pub use emoji::{EmojiTable, DEFAULT_EMOJI};
pub use transaction::{join_category, Transaction, CATEGORY_SEPARATOR};
