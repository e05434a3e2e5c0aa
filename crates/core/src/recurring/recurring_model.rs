//! Recurring expense domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::YearMonth;
use crate::transactions::{LedgerTransaction, NewLedgerTransaction};

/// A monthly expense generated on demand, at most once per calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: String,
    pub owner_id: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    pub is_active: bool,
    /// Latest month a transaction was generated for.
    pub last_generated_period: Option<YearMonth>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_active() -> bool {
    true
}

/// Input model for creating a recurring expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringExpense {
    pub owner_id: String,
    pub description: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub day_of_month: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Partial update of a recurring expense. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpenseUpdate {
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub day_of_month: Option<u32>,
    pub is_active: Option<bool>,
}

/// One month's generation computed against a known `last_generated_period`.
///
/// Storage applies it only if the definition still carries `expected_last`.
#[derive(Debug, Clone)]
pub struct RecurringGeneration {
    pub expense_id: String,
    pub owner_id: String,
    pub period: YearMonth,
    pub expected_last: Option<YearMonth>,
    pub next_last: YearMonth,
    pub transaction: NewLedgerTransaction,
}

/// A definition after generation, with the transaction written for it.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub expense: RecurringExpense,
    pub transaction: LedgerTransaction,
}

/// Outcome of generating every active definition for one month.
#[derive(Debug, Clone)]
pub struct GenerationBatch {
    pub period: YearMonth,
    pub transactions: Vec<LedgerTransaction>,
    /// Ids of definitions that already had a transaction for the month.
    pub skipped: Vec<String>,
}
