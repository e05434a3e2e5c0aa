//! Database models for recurring expenses.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use ledgerline_core::constants::DEFAULT_CATEGORY;
use ledgerline_core::recurring::{NewRecurringExpense, RecurringExpense};
use ledgerline_core::{Error, Result, YearMonth};

use crate::errors::StorageError;
use crate::utils::{parse_decimal, to_i32, to_u32};

/// Database model for recurring expenses
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recurring_expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecurringExpenseDB {
    pub id: String,
    pub owner_id: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub day_of_month: i32,
    pub is_active: bool,
    pub last_generated_month: Option<i32>,
    pub last_generated_year: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Columns an edit may change. Generation history is not among them.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::recurring_expenses)]
pub struct RecurringExpenseChangesDB {
    pub description: String,
    pub category: String,
    pub amount: String,
    pub day_of_month: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl RecurringExpenseDB {
    pub fn from_new(new_expense: NewRecurringExpense, now: NaiveDateTime) -> Self {
        RecurringExpenseDB {
            id: Uuid::new_v4().to_string(),
            owner_id: new_expense.owner_id,
            description: new_expense.description,
            category: new_expense.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            amount: new_expense.amount.to_string(),
            day_of_month: to_i32(new_expense.day_of_month),
            is_active: new_expense.is_active,
            last_generated_month: None,
            last_generated_year: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn last_generated_period(&self) -> Result<Option<YearMonth>> {
        match (self.last_generated_year, self.last_generated_month) {
            (Some(year), Some(month)) => {
                let month = to_u32(month, "last_generated_month")?;
                let period = YearMonth::new(year, month).map_err(|e| {
                    Error::from(StorageError::Corrupt(format!(
                        "Recurring expense {} has an invalid last period: {}",
                        self.id, e
                    )))
                })?;
                Ok(Some(period))
            }
            (None, None) => Ok(None),
            _ => Err(StorageError::Corrupt(format!(
                "Recurring expense {} has a partial last period",
                self.id
            ))
            .into()),
        }
    }
}

impl RecurringExpenseChangesDB {
    pub fn from_expense(expense: RecurringExpense, now: NaiveDateTime) -> Self {
        RecurringExpenseChangesDB {
            description: expense.description,
            category: expense.category,
            amount: expense.amount.to_string(),
            day_of_month: to_i32(expense.day_of_month),
            is_active: expense.is_active,
            updated_at: now,
        }
    }
}

impl TryFrom<RecurringExpenseDB> for RecurringExpense {
    type Error = Error;

    fn try_from(db: RecurringExpenseDB) -> Result<Self> {
        let last_generated_period = db.last_generated_period()?;
        Ok(RecurringExpense {
            amount: parse_decimal(&db.amount, "amount")?,
            day_of_month: to_u32(db.day_of_month, "day_of_month")?,
            last_generated_period,
            id: db.id,
            owner_id: db.owner_id,
            description: db.description,
            category: db.category,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
