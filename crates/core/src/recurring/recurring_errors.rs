use rust_decimal::Decimal;
use thiserror::Error;

use crate::constants::{MAX_GENERATION_YEAR, MIN_GENERATION_YEAR};
use crate::errors::ErrorKind;
use crate::schedule::YearMonth;

/// Failures of recurring expense definitions and their generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurringError {
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    #[error("Day of month must be between 1 and 31, got {0}")]
    InvalidDayOfMonth(u32),

    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error(
        "Year must be between {} and {}, got {0}",
        MIN_GENERATION_YEAR,
        MAX_GENERATION_YEAR
    )]
    InvalidYear(i32),

    #[error("Recurring expense {0} is inactive")]
    RecurringInactive(String),

    #[error("Recurring expense {expense_id} was already generated for {period}")]
    AlreadyGenerated { expense_id: String, period: YearMonth },

    #[error("Recurring expense {0} was modified concurrently")]
    ConcurrentModification(String),
}

impl RecurringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecurringError::InvalidAmount(_)
            | RecurringError::InvalidDayOfMonth(_)
            | RecurringError::InvalidMonth(_)
            | RecurringError::InvalidYear(_) => ErrorKind::Validation,
            RecurringError::RecurringInactive(_) | RecurringError::AlreadyGenerated { .. } => {
                ErrorKind::StateConflict
            }
            RecurringError::ConcurrentModification(_) => ErrorKind::Concurrency,
        }
    }

    /// Request field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RecurringError::InvalidAmount(_) => Some("amount"),
            RecurringError::InvalidDayOfMonth(_) => Some("dayOfMonth"),
            RecurringError::InvalidMonth(_) => Some("month"),
            RecurringError::InvalidYear(_) => Some("year"),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RecurringError::InvalidAmount(_) => "INVALID_AMOUNT",
            RecurringError::InvalidDayOfMonth(_) => "INVALID_DAY_OF_MONTH",
            RecurringError::InvalidMonth(_) => "INVALID_MONTH",
            RecurringError::InvalidYear(_) => "INVALID_YEAR",
            RecurringError::RecurringInactive(_) => "RECURRING_INACTIVE",
            RecurringError::AlreadyGenerated { .. } => "ALREADY_GENERATED",
            RecurringError::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
        }
    }
}
