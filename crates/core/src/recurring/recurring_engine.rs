//! Recurring expense generation rules.

use log::debug;
use rust_decimal::Decimal;

use super::recurring_errors::RecurringError;
use super::recurring_model::{
    NewRecurringExpense, RecurringExpense, RecurringExpenseUpdate, RecurringGeneration,
};
use crate::constants::{
    DEFAULT_CATEGORY, MAX_GENERATION_YEAR, MAX_PAYMENT_DAY, MIN_GENERATION_YEAR, MIN_PAYMENT_DAY,
};
use crate::errors::{Result, ValidationError};
use crate::schedule::{period_date, YearMonth};
use crate::transactions::{recurring_key, NewLedgerTransaction, TransactionSource};

pub fn validate_definition(
    amount: Decimal,
    day_of_month: u32,
) -> std::result::Result<(), RecurringError> {
    if amount <= Decimal::ZERO {
        return Err(RecurringError::InvalidAmount(amount));
    }
    if !(MIN_PAYMENT_DAY..=MAX_PAYMENT_DAY).contains(&day_of_month) {
        return Err(RecurringError::InvalidDayOfMonth(day_of_month));
    }
    Ok(())
}

/// Validates a requested generation month.
pub fn generation_period(month: u32, year: i32) -> std::result::Result<YearMonth, RecurringError> {
    if !(MIN_GENERATION_YEAR..=MAX_GENERATION_YEAR).contains(&year) {
        return Err(RecurringError::InvalidYear(year));
    }
    YearMonth::new(year, month).map_err(|_| RecurringError::InvalidMonth(month))
}

fn normalized_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("description".to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn normalized_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Validates and normalizes a new definition.
pub fn prepare_new(input: NewRecurringExpense) -> Result<NewRecurringExpense> {
    validate_definition(input.amount, input.day_of_month)?;
    Ok(NewRecurringExpense {
        description: normalized_description(&input.description)?,
        category: Some(normalized_category(input.category)),
        ..input
    })
}

/// Applies an edit to a copy of `expense`. Generation history is never touched.
pub fn apply_update(
    expense: &RecurringExpense,
    update: RecurringExpenseUpdate,
) -> Result<RecurringExpense> {
    let mut updated = expense.clone();
    if let Some(description) = update.description {
        updated.description = normalized_description(&description)?;
    }
    if let Some(category) = update.category {
        updated.category = normalized_category(Some(category));
    }
    if let Some(amount) = update.amount {
        updated.amount = amount;
    }
    if let Some(day_of_month) = update.day_of_month {
        updated.day_of_month = day_of_month;
    }
    if let Some(is_active) = update.is_active {
        updated.is_active = is_active;
    }
    validate_definition(updated.amount, updated.day_of_month)?;
    Ok(updated)
}

/// Computes the transaction for `period` and the resulting progress marker.
///
/// Only the direct repeat of `last_generated_period` is caught here; earlier
/// months are checked against the ledger's idempotency keys by the caller.
pub fn plan_generation(expense: &RecurringExpense, period: YearMonth) -> Result<RecurringGeneration> {
    if !expense.is_active {
        return Err(RecurringError::RecurringInactive(expense.id.clone()).into());
    }
    if expense.last_generated_period == Some(period) {
        return Err(RecurringError::AlreadyGenerated {
            expense_id: expense.id.clone(),
            period,
        }
        .into());
    }

    let occurred_on = period_date(period.first_day()?, expense.day_of_month, 0)?;
    let next_last = expense
        .last_generated_period
        .map_or(period, |last| last.max(period));
    debug!(
        "Generating recurring expense {} for {} on {}",
        expense.id, period, occurred_on
    );

    Ok(RecurringGeneration {
        expense_id: expense.id.clone(),
        owner_id: expense.owner_id.clone(),
        period,
        expected_last: expense.last_generated_period,
        next_last,
        transaction: NewLedgerTransaction {
            owner_id: expense.owner_id.clone(),
            group_id: None,
            description: expense.description.clone(),
            category: expense.category.clone(),
            amount: expense.amount,
            occurred_on,
            source: TransactionSource::recurring(&expense.id, period),
            is_shared: false,
            paid_by_member_id: None,
            idempotency_key: recurring_key(&expense.id, period),
        },
    })
}
