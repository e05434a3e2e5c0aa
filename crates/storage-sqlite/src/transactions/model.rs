//! Database models for ledger transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use ledgerline_core::transactions::{LedgerTransaction, NewLedgerTransaction, TransactionSource};
use ledgerline_core::{Error, Result};

use crate::errors::StorageError;
use crate::utils::{parse_decimal, to_i32, to_u32};

const SOURCE_INSTALLMENT: &str = "INSTALLMENT";
const SOURCE_RECURRING: &str = "RECURRING";

/// Database model for ledger transactions
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerTransactionDB {
    pub id: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub occurred_on: NaiveDate,
    pub source_type: String,
    pub installment_plan_id: Option<String>,
    pub period_index: Option<i32>,
    pub period_total: Option<i32>,
    pub recurring_expense_id: Option<String>,
    pub period_month: Option<i32>,
    pub period_year: Option<i32>,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub idempotency_key: String,
    pub created_at: NaiveDateTime,
}

impl LedgerTransactionDB {
    /// Row for a new transaction, with a fresh id.
    pub fn from_new(transaction: NewLedgerTransaction, created_at: NaiveDateTime) -> Self {
        let mut row = LedgerTransactionDB {
            id: Uuid::new_v4().to_string(),
            owner_id: transaction.owner_id,
            group_id: transaction.group_id,
            description: transaction.description,
            category: transaction.category,
            amount: transaction.amount.to_string(),
            occurred_on: transaction.occurred_on,
            source_type: String::new(),
            installment_plan_id: None,
            period_index: None,
            period_total: None,
            recurring_expense_id: None,
            period_month: None,
            period_year: None,
            is_shared: transaction.is_shared,
            paid_by_member_id: transaction.paid_by_member_id,
            idempotency_key: transaction.idempotency_key,
            created_at,
        };

        match transaction.source {
            TransactionSource::Installment {
                plan_id,
                period_index,
                period_total,
            } => {
                row.source_type = SOURCE_INSTALLMENT.to_string();
                row.installment_plan_id = plan_id;
                row.period_index = Some(to_i32(period_index));
                row.period_total = Some(to_i32(period_total));
            }
            TransactionSource::Recurring {
                expense_id,
                month,
                year,
            } => {
                row.source_type = SOURCE_RECURRING.to_string();
                row.recurring_expense_id = expense_id;
                row.period_month = Some(to_i32(month));
                row.period_year = Some(year);
            }
        }
        row
    }

    fn source(&self) -> Result<TransactionSource> {
        let missing = |column: &str| -> Error {
            StorageError::Corrupt(format!(
                "Transaction {} has no {} for source {}",
                self.id, column, self.source_type
            ))
            .into()
        };

        match self.source_type.as_str() {
            SOURCE_INSTALLMENT => Ok(TransactionSource::Installment {
                plan_id: self.installment_plan_id.clone(),
                period_index: to_u32(
                    self.period_index.ok_or_else(|| missing("period_index"))?,
                    "period_index",
                )?,
                period_total: to_u32(
                    self.period_total.ok_or_else(|| missing("period_total"))?,
                    "period_total",
                )?,
            }),
            SOURCE_RECURRING => Ok(TransactionSource::Recurring {
                expense_id: self.recurring_expense_id.clone(),
                month: to_u32(
                    self.period_month.ok_or_else(|| missing("period_month"))?,
                    "period_month",
                )?,
                year: self.period_year.ok_or_else(|| missing("period_year"))?,
            }),
            other => Err(StorageError::Corrupt(format!(
                "Unknown transaction source '{}'",
                other
            ))
            .into()),
        }
    }
}

impl TryFrom<LedgerTransactionDB> for LedgerTransaction {
    type Error = Error;

    fn try_from(db: LedgerTransactionDB) -> Result<Self> {
        let source = db.source()?;
        Ok(LedgerTransaction {
            amount: parse_decimal(&db.amount, "amount")?,
            id: db.id,
            owner_id: db.owner_id,
            group_id: db.group_id,
            description: db.description,
            category: db.category,
            occurred_on: db.occurred_on,
            source,
            is_shared: db.is_shared,
            paid_by_member_id: db.paid_by_member_id,
            idempotency_key: db.idempotency_key,
            created_at: db.created_at,
        })
    }
}
