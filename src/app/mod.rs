mod report;
mod types;

pub use report::{build_report, range_output, transaction_output, weeks_output};
pub use types::{
    CategoryOutput, RangeOutput, ReportOutput, TransactionOutput, WeekOutput, WeeksOutput,
};
