use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use ledgerline_core::transactions::{LedgerRepositoryTrait, LedgerTransaction, NewLedgerTransaction};
use ledgerline_core::Result;

use super::model::LedgerTransactionDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::ledger_transactions;
use crate::schema::ledger_transactions::dsl::*;

/// Inserts ledger rows on a connection that is already inside a write transaction.
///
/// A duplicate idempotency key surfaces as a unique violation for the caller to map.
pub(crate) fn insert_ledger_rows(
    conn: &mut SqliteConnection,
    transactions: Vec<NewLedgerTransaction>,
) -> QueryResult<Vec<LedgerTransactionDB>> {
    let now = Utc::now().naive_utc();
    let mut inserted = Vec::with_capacity(transactions.len());
    for transaction in transactions {
        let row = LedgerTransactionDB::from_new(transaction, now);
        let stored = diesel::insert_into(ledger_transactions::table)
            .values(&row)
            .returning(LedgerTransactionDB::as_returning())
            .get_result(conn)?;
        inserted.push(stored);
    }
    Ok(inserted)
}

pub(crate) fn to_domain(rows: Vec<LedgerTransactionDB>) -> Result<Vec<LedgerTransaction>> {
    rows.into_iter().map(LedgerTransaction::try_from).collect()
}

pub struct LedgerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl LedgerRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        LedgerRepository { pool }
    }
}

impl LedgerRepositoryTrait for LedgerRepository {
    fn list_for_plan(&self, owner: &str, plan_id: &str) -> Result<Vec<LedgerTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_transactions
            .filter(owner_id.eq(owner))
            .filter(installment_plan_id.eq(plan_id))
            .order((period_index.asc(), created_at.asc()))
            .select(LedgerTransactionDB::as_select())
            .load::<LedgerTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn list_for_recurring(&self, owner: &str, expense_id: &str) -> Result<Vec<LedgerTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_transactions
            .filter(owner_id.eq(owner))
            .filter(recurring_expense_id.eq(expense_id))
            .order((period_year.asc(), period_month.asc()))
            .select(LedgerTransactionDB::as_select())
            .load::<LedgerTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn exists_by_key(&self, key: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = diesel::select(diesel::dsl::exists(
            ledger_transactions.filter(idempotency_key.eq(key)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?;
        Ok(found)
    }
}
