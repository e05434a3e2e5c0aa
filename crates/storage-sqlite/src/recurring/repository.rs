use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use ledgerline_core::errors::DatabaseError;
use ledgerline_core::recurring::{
    ExpenseEdit, GenerationResult, GenerationStep, NewRecurringExpense, RecurringError,
    RecurringExpense, RecurringExpenseRepositoryTrait, RecurringGeneration,
};
use ledgerline_core::transactions::LedgerTransaction;
use ledgerline_core::{Error, Result};

use super::model::{RecurringExpenseChangesDB, RecurringExpenseDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, StorageError};
use crate::schema::recurring_expenses;
use crate::transactions::insert_ledger_rows;
use crate::utils::to_i32;

fn expense_not_found(expense_id: &str) -> Error {
    DatabaseError::NotFound(format!("Recurring expense {}", expense_id)).into()
}

fn load_expense(
    conn: &mut SqliteConnection,
    owner: &str,
    expense_id: &str,
) -> Result<RecurringExpenseDB> {
    recurring_expenses::table
        .filter(recurring_expenses::id.eq(expense_id))
        .filter(recurring_expenses::owner_id.eq(owner))
        .select(RecurringExpenseDB::as_select())
        .first::<RecurringExpenseDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| expense_not_found(expense_id))
}

/// Moves the marker and inserts the month's transaction.
fn write_generation(
    conn: &mut SqliteConnection,
    generation: RecurringGeneration,
) -> Result<GenerationResult> {
    let RecurringGeneration {
        expense_id,
        owner_id: owner,
        period,
        expected_last,
        next_last,
        transaction,
    } = generation;

    let target = recurring_expenses::table
        .filter(recurring_expenses::id.eq(&expense_id))
        .filter(recurring_expenses::owner_id.eq(&owner));
    let changes = (
        recurring_expenses::last_generated_month.eq(Some(to_i32(next_last.month()))),
        recurring_expenses::last_generated_year.eq(Some(next_last.year())),
        recurring_expenses::updated_at.eq(Utc::now().naive_utc()),
    );
    let affected = match expected_last {
        Some(last) => diesel::update(
            target
                .filter(recurring_expenses::last_generated_month.eq(to_i32(last.month())))
                .filter(recurring_expenses::last_generated_year.eq(last.year())),
        )
        .set(changes)
        .execute(conn),
        None => diesel::update(
            target
                .filter(recurring_expenses::last_generated_month.is_null())
                .filter(recurring_expenses::last_generated_year.is_null()),
        )
        .set(changes)
        .execute(conn),
    }
    .map_err(StorageError::from)?;

    if affected == 0 {
        // Distinguishes a missing definition from a stale marker
        load_expense(conn, &owner, &expense_id)?;
        return Err(RecurringError::ConcurrentModification(expense_id).into());
    }

    let inserted = insert_ledger_rows(conn, vec![transaction]).map_err(|e| {
        if is_unique_violation(&e) {
            Error::from(RecurringError::AlreadyGenerated {
                expense_id: expense_id.clone(),
                period,
            })
        } else {
            StorageError::from(e).into()
        }
    })?;

    let expense = RecurringExpense::try_from(load_expense(conn, &owner, &expense_id)?)?;
    let transaction = inserted
        .into_iter()
        .next()
        .ok_or_else(|| {
            Error::from(StorageError::Corrupt(format!(
                "No transaction written for recurring expense {}",
                expense_id
            )))
        })
        .and_then(LedgerTransaction::try_from)?;

    Ok(GenerationResult {
        expense,
        transaction,
    })
}

pub struct RecurringExpenseRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RecurringExpenseRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        RecurringExpenseRepository { pool, writer }
    }
}

#[async_trait]
impl RecurringExpenseRepositoryTrait for RecurringExpenseRepository {
    fn get_by_id(&self, owner: &str, expense_id: &str) -> Result<RecurringExpense> {
        let mut conn = get_connection(&self.pool)?;
        RecurringExpense::try_from(load_expense(&mut conn, owner, expense_id)?)
    }

    fn list(&self, owner: &str, is_active: Option<bool>) -> Result<Vec<RecurringExpense>> {
        let mut conn = get_connection(&self.pool)?;

        let mut sql = recurring_expenses::table
            .filter(recurring_expenses::owner_id.eq(owner))
            .into_boxed();
        if let Some(active) = is_active {
            sql = sql.filter(recurring_expenses::is_active.eq(active));
        }

        let rows = sql
            .order((
                recurring_expenses::day_of_month.asc(),
                recurring_expenses::description.asc(),
            ))
            .select(RecurringExpenseDB::as_select())
            .load::<RecurringExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(RecurringExpense::try_from).collect()
    }

    async fn create(&self, new_expense: NewRecurringExpense) -> Result<RecurringExpense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecurringExpense> {
                let row = RecurringExpenseDB::from_new(new_expense, Utc::now().naive_utc());
                let stored = diesel::insert_into(recurring_expenses::table)
                    .values(&row)
                    .returning(RecurringExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                RecurringExpense::try_from(stored)
            })
            .await
    }

    async fn update(
        &self,
        owner: &str,
        expense_id: &str,
        edit: ExpenseEdit,
    ) -> Result<RecurringExpense> {
        let owner = owner.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecurringExpense> {
                let current = RecurringExpense::try_from(load_expense(conn, &owner, &expense_id)?)?;
                let edited = edit(&current)?;
                let changes = RecurringExpenseChangesDB::from_expense(edited, Utc::now().naive_utc());

                let affected = diesel::update(
                    recurring_expenses::table
                        .filter(recurring_expenses::id.eq(&expense_id))
                        .filter(recurring_expenses::owner_id.eq(&owner)),
                )
                .set(&changes)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(expense_not_found(&expense_id));
                }

                RecurringExpense::try_from(load_expense(conn, &owner, &expense_id)?)
            })
            .await
    }

    async fn record_generation(
        &self,
        owner: &str,
        expense_id: &str,
        step: GenerationStep,
    ) -> Result<GenerationResult> {
        let owner = owner.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GenerationResult> {
                let current = RecurringExpense::try_from(load_expense(conn, &owner, &expense_id)?)?;
                write_generation(conn, step(&current)?)
            })
            .await
    }

    async fn delete(&self, owner: &str, expense_id: &str) -> Result<usize> {
        let owner = owner.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    recurring_expenses::table
                        .filter(recurring_expenses::id.eq(expense_id))
                        .filter(recurring_expenses::owner_id.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
