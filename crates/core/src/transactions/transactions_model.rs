//! Ledger transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::YearMonth;

/// What generated a ledger transaction.
///
/// The originating id becomes `None` once the plan or definition is deleted;
/// the transaction itself stays in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionSource {
    #[serde(rename_all = "camelCase")]
    Installment {
        plan_id: Option<String>,
        period_index: u32,
        period_total: u32,
    },
    #[serde(rename_all = "camelCase")]
    Recurring {
        expense_id: Option<String>,
        month: u32,
        year: i32,
    },
}

impl TransactionSource {
    pub fn installment(plan_id: &str, period_index: u32, period_total: u32) -> Self {
        TransactionSource::Installment {
            plan_id: Some(plan_id.to_string()),
            period_index,
            period_total,
        }
    }

    pub fn recurring(expense_id: &str, period: YearMonth) -> Self {
        TransactionSource::Recurring {
            expense_id: Some(expense_id.to_string()),
            month: period.month(),
            year: period.year(),
        }
    }
}

/// A transaction about to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerTransaction {
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub source: TransactionSource,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub idempotency_key: String,
}

/// A persisted ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    pub id: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub source: TransactionSource,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub idempotency_key: String,
    pub created_at: NaiveDateTime,
}
