//! Schedule module - calendar math shared by every generation path.
//!
//! Installment plans, recurring expenses, the month filter and the preview
//! endpoint all derive payment dates from these functions, so a payment day
//! that does not exist in a month is clamped the same way everywhere.

mod amortization;
mod period;
mod year_month;

use thiserror::Error;

pub use amortization::{period_amount, regular_share};
pub use period::{days_in_month, elapsed_periods, period_date};
pub use year_month::YearMonth;

/// Errors raised by calendar arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Date is outside the supported calendar range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    #[error("Invalid year-month '{0}', expected YYYY-MM")]
    InvalidYearMonth(String),
}
