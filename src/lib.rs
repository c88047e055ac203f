pub mod app;
pub mod calendar;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod spending;
pub mod sync;

pub use calendar::{financial_month_range, FinancialCalendar, FinancialMonthRange, WeekMarker};
pub use classify::{classify, summarize, CategorySummary, Classified};
pub use error::{Error, Result};
pub use spending::{total_spent, transactions_in_week, week_groups, WeekGroup};
pub use sync::{TransactionFeed, TransactionFetcher, TransactionSource};
