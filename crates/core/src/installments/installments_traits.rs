//! Installment repository and service traits.
//!
//! These traits define the contract for plan operations without any
//! database-specific types.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::installments_model::{
    InstallmentPlan, InstallmentPlanUpdate, InstallmentQuery, NewInstallmentPlan, PlanChange,
    PlanOpening, PlanProgress, SchedulePreview, SchedulePreviewRequest,
};
use crate::errors::Result;
use crate::transactions::LedgerTransaction;

/// Computes a progress transition from the plan as currently stored.
pub type ProgressStep = Box<dyn FnOnce(&InstallmentPlan) -> Result<PlanProgress> + Send>;

/// Computes the edited plan from the plan as currently stored.
pub type PlanEdit = Box<dyn FnOnce(&InstallmentPlan) -> Result<InstallmentPlan> + Send>;

/// Trait defining the contract for installment plan persistence.
///
/// Mutations receive a closure instead of a precomputed value: the repository
/// loads the plan, runs the closure and writes the result as one serialized
/// step, so concurrent mutations of a plan apply one after another. Writes
/// stay conditional on the `ProgressStamp` the closure computed against.
#[async_trait]
pub trait InstallmentRepositoryTrait: Send + Sync {
    /// Retrieves a plan owned by `owner_id`. Foreign plans are reported as not found.
    fn get_by_id(&self, owner_id: &str, plan_id: &str) -> Result<InstallmentPlan>;

    /// Lists the owner's plans matching the status and group filters.
    ///
    /// The month filter of `query` is applied by the service.
    fn list(&self, owner_id: &str, query: &InstallmentQuery) -> Result<Vec<InstallmentPlan>>;

    /// Inserts a plan and the transactions of its initially paid periods.
    async fn create(&self, opening: PlanOpening) -> Result<PlanChange>;

    /// Loads the plan, applies `edit` and writes the edited fields.
    async fn update(&self, owner_id: &str, plan_id: &str, edit: PlanEdit)
        -> Result<InstallmentPlan>;

    /// Loads the plan, computes a transition with `step`, then moves the plan
    /// to `progress.next` and inserts the new transactions.
    ///
    /// Errors from `step` are returned as-is. Fails with a
    /// concurrent-modification error, committing nothing, if the stored plan
    /// no longer matches `progress.expected` when the write runs.
    async fn apply_progress(
        &self,
        owner_id: &str,
        plan_id: &str,
        step: ProgressStep,
    ) -> Result<PlanChange>;

    /// Deletes a plan. Its ledger transactions are kept.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, owner_id: &str, plan_id: &str) -> Result<usize>;
}

/// Trait defining the contract for installment plan operations.
#[async_trait]
pub trait InstallmentServiceTrait: Send + Sync {
    fn get_plan(&self, owner_id: &str, plan_id: &str) -> Result<InstallmentPlan>;

    fn list_plans(&self, owner_id: &str, query: InstallmentQuery) -> Result<Vec<InstallmentPlan>>;

    fn list_plan_transactions(&self, owner_id: &str, plan_id: &str)
        -> Result<Vec<LedgerTransaction>>;

    /// Period list for prospective terms, as of today unless `as_of` is given.
    fn preview_schedule(&self, request: SchedulePreviewRequest) -> Result<SchedulePreview>;

    async fn create_plan(&self, new_plan: NewInstallmentPlan) -> Result<PlanChange>;

    async fn update_plan(
        &self,
        owner_id: &str,
        plan_id: &str,
        update: InstallmentPlanUpdate,
    ) -> Result<InstallmentPlan>;

    /// Records the next period, optionally with an explicit payment date.
    async fn pay_next(
        &self,
        owner_id: &str,
        plan_id: &str,
        payment_date: Option<NaiveDate>,
    ) -> Result<PlanChange>;

    /// Records every period up to `target_paid_count`.
    async fn mark_paid(
        &self,
        owner_id: &str,
        plan_id: &str,
        target_paid_count: u32,
    ) -> Result<PlanChange>;

    async fn cancel_plan(&self, owner_id: &str, plan_id: &str) -> Result<InstallmentPlan>;

    async fn delete_plan(&self, owner_id: &str, plan_id: &str) -> Result<()>;
}
