use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::Error as DieselError;
use diesel::SqliteConnection;
use log::debug;

use ledgerline_core::errors::DatabaseError;
use ledgerline_core::installments::{
    InstallmentError, InstallmentPlan, InstallmentQuery, InstallmentRepositoryTrait, PlanChange,
    PlanEdit, PlanOpening, PlanProgress, ProgressStep,
};
use ledgerline_core::{Error, Result};

use super::model::{InstallmentPlanDB, InstallmentPlanTermsDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, StorageError};
use crate::schema::installment_plans;
use crate::transactions::{insert_ledger_rows, to_domain};
use crate::utils::to_i32;

fn plan_not_found(plan_id: &str) -> Error {
    DatabaseError::NotFound(format!("Installment plan {}", plan_id)).into()
}

/// A duplicate idempotency key means another writer recorded the same period first.
fn ledger_insert_error(err: DieselError, plan_id: &str) -> Error {
    if is_unique_violation(&err) {
        InstallmentError::ConcurrentModification(plan_id.to_string()).into()
    } else {
        StorageError::from(err).into()
    }
}

fn load_plan(conn: &mut SqliteConnection, owner: &str, plan_id: &str) -> Result<InstallmentPlanDB> {
    installment_plans::table
        .filter(installment_plans::id.eq(plan_id))
        .filter(installment_plans::owner_id.eq(owner))
        .select(InstallmentPlanDB::as_select())
        .first::<InstallmentPlanDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| plan_not_found(plan_id))
}

/// Explains a conditional write that matched no row.
fn stale_write_error(conn: &mut SqliteConnection, owner: &str, plan_id: &str) -> Error {
    match load_plan(conn, owner, plan_id) {
        Ok(_) => InstallmentError::ConcurrentModification(plan_id.to_string()).into(),
        Err(e) => e,
    }
}

/// Applies a transition if the plan still carries `progress.expected`.
fn write_progress(conn: &mut SqliteConnection, progress: PlanProgress) -> Result<PlanChange> {
    let PlanProgress {
        plan_id,
        owner_id: owner,
        expected,
        next,
        transactions,
    } = progress;

    let affected = diesel::update(
        installment_plans::table
            .filter(installment_plans::id.eq(&plan_id))
            .filter(installment_plans::owner_id.eq(&owner))
            .filter(installment_plans::paid_count.eq(to_i32(expected.paid_count)))
            .filter(installment_plans::status.eq(expected.status.as_str())),
    )
    .set((
        installment_plans::paid_count.eq(to_i32(next.paid_count)),
        installment_plans::status.eq(next.status.as_str()),
        installment_plans::updated_at.eq(Utc::now().naive_utc()),
    ))
    .execute(conn)
    .map_err(StorageError::from)?;
    if affected == 0 {
        debug!("Plan {} moved on before progress could be applied", plan_id);
        return Err(stale_write_error(conn, &owner, &plan_id));
    }

    let inserted =
        insert_ledger_rows(conn, transactions).map_err(|e| ledger_insert_error(e, &plan_id))?;

    Ok(PlanChange {
        plan: InstallmentPlan::try_from(load_plan(conn, &owner, &plan_id)?)?,
        transactions: to_domain(inserted)?,
    })
}

pub struct InstallmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InstallmentRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        InstallmentRepository { pool, writer }
    }
}

#[async_trait]
impl InstallmentRepositoryTrait for InstallmentRepository {
    fn get_by_id(&self, owner: &str, plan_id: &str) -> Result<InstallmentPlan> {
        let mut conn = get_connection(&self.pool)?;
        InstallmentPlan::try_from(load_plan(&mut conn, owner, plan_id)?)
    }

    fn list(&self, owner: &str, query: &InstallmentQuery) -> Result<Vec<InstallmentPlan>> {
        let mut conn = get_connection(&self.pool)?;

        let mut sql = installment_plans::table
            .filter(installment_plans::owner_id.eq(owner))
            .into_boxed();
        if let Some(status) = query.status {
            sql = sql.filter(installment_plans::status.eq(status.as_str()));
        }
        if let Some(group) = &query.group_id {
            sql = sql.filter(installment_plans::group_id.eq(group.clone()));
        }

        let rows = sql
            .order((
                installment_plans::start_date.asc(),
                installment_plans::created_at.asc(),
            ))
            .select(InstallmentPlanDB::as_select())
            .load::<InstallmentPlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(InstallmentPlan::try_from).collect()
    }

    async fn create(&self, opening: PlanOpening) -> Result<PlanChange> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PlanChange> {
                let plan_id = opening.draft.id.clone();
                let row = InstallmentPlanDB::from_draft(opening.draft, Utc::now().naive_utc());

                let stored = diesel::insert_into(installment_plans::table)
                    .values(&row)
                    .returning(InstallmentPlanDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                let transactions = insert_ledger_rows(conn, opening.transactions)
                    .map_err(|e| ledger_insert_error(e, &plan_id))?;

                Ok(PlanChange {
                    plan: InstallmentPlan::try_from(stored)?,
                    transactions: to_domain(transactions)?,
                })
            })
            .await
    }

    async fn update(
        &self,
        owner: &str,
        plan_id: &str,
        edit: PlanEdit,
    ) -> Result<InstallmentPlan> {
        let owner = owner.to_string();
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<InstallmentPlan> {
                let current = InstallmentPlan::try_from(load_plan(conn, &owner, &plan_id)?)?;
                let expected = current.stamp();
                let edited = edit(&current)?;
                let terms = InstallmentPlanTermsDB::from_plan(edited, Utc::now().naive_utc());

                let affected = diesel::update(
                    installment_plans::table
                        .filter(installment_plans::id.eq(&plan_id))
                        .filter(installment_plans::owner_id.eq(&owner))
                        .filter(installment_plans::paid_count.eq(to_i32(expected.paid_count)))
                        .filter(installment_plans::status.eq(expected.status.as_str())),
                )
                .set(&terms)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(stale_write_error(conn, &owner, &plan_id));
                }

                InstallmentPlan::try_from(load_plan(conn, &owner, &plan_id)?)
            })
            .await
    }

    async fn apply_progress(
        &self,
        owner: &str,
        plan_id: &str,
        step: ProgressStep,
    ) -> Result<PlanChange> {
        let owner = owner.to_string();
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PlanChange> {
                let current = InstallmentPlan::try_from(load_plan(conn, &owner, &plan_id)?)?;
                write_progress(conn, step(&current)?)
            })
            .await
    }

    async fn delete(&self, owner: &str, plan_id: &str) -> Result<usize> {
        let owner = owner.to_string();
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    installment_plans::table
                        .filter(installment_plans::id.eq(plan_id))
                        .filter(installment_plans::owner_id.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
