use rust_decimal::Decimal;
use thiserror::Error;

use crate::constants::MAX_PERIOD_COUNT;
use crate::errors::ErrorKind;

/// Failures of the installment plan lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallmentError {
    #[error("Total amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    #[error("Installment count must be between 1 and {}, got {0}", MAX_PERIOD_COUNT)]
    InvalidPeriodCount(u32),

    #[error("Payment day must be between 1 and 31, got {0}")]
    InvalidPaymentDay(u32),

    #[error("All {0} installments are already paid")]
    AlreadyComplete(u32),

    #[error("Installment plan is cancelled")]
    PlanCancelled,

    #[error("Installment plan is already cancelled")]
    AlreadyCancelled,

    #[error("Paid count must be greater than {paid_count} and at most {period_count}, got {target}")]
    InvalidTarget {
        target: u32,
        paid_count: u32,
        period_count: u32,
    },

    #[error("Amount, installment count and dates can only change before the first payment")]
    TermsLocked,

    #[error("Group of an installment plan cannot be changed")]
    GroupImmutable,

    #[error("Installment plan {0} was modified concurrently")]
    ConcurrentModification(String),
}

impl InstallmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InstallmentError::InvalidAmount(_)
            | InstallmentError::InvalidPeriodCount(_)
            | InstallmentError::InvalidPaymentDay(_) => ErrorKind::Validation,
            InstallmentError::ConcurrentModification(_) => ErrorKind::Concurrency,
            _ => ErrorKind::StateConflict,
        }
    }

    /// Request field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            InstallmentError::InvalidAmount(_) => Some("totalAmount"),
            InstallmentError::InvalidPeriodCount(_) => Some("periodCount"),
            InstallmentError::InvalidPaymentDay(_) => Some("paymentDay"),
            InstallmentError::InvalidTarget { .. } => Some("paidCount"),
            InstallmentError::GroupImmutable => Some("groupId"),
            _ => None,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            InstallmentError::InvalidAmount(_) => "INVALID_AMOUNT",
            InstallmentError::InvalidPeriodCount(_) => "INVALID_PERIOD_COUNT",
            InstallmentError::InvalidPaymentDay(_) => "INVALID_PAYMENT_DAY",
            InstallmentError::AlreadyComplete(_) => "ALREADY_COMPLETE",
            InstallmentError::PlanCancelled => "PLAN_CANCELLED",
            InstallmentError::AlreadyCancelled => "ALREADY_CANCELLED",
            InstallmentError::InvalidTarget { .. } => "INVALID_TARGET",
            InstallmentError::TermsLocked => "TERMS_LOCKED",
            InstallmentError::GroupImmutable => "GROUP_IMMUTABLE",
            InstallmentError::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
        }
    }
}
