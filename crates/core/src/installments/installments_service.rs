use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use uuid::Uuid;

use super::installments_engine::{
    advance_one, advance_to, apply_update, cancel, open_plan, plans_due_in_month,
    preview_schedule,
};
use super::installments_model::{
    InstallmentPlan, InstallmentPlanUpdate, InstallmentQuery, NewInstallmentPlan, PlanChange,
    SchedulePreview, SchedulePreviewRequest,
};
use super::installments_traits::{InstallmentRepositoryTrait, InstallmentServiceTrait};
use crate::errors::{DatabaseError, Result};
use crate::transactions::{LedgerRepositoryTrait, LedgerTransaction};
use crate::utils::{retry_on_conflict, Clock};

/// Service for managing installment plans.
pub struct InstallmentService {
    repository: Arc<dyn InstallmentRepositoryTrait>,
    ledger: Arc<dyn LedgerRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl InstallmentService {
    pub fn new(
        repository: Arc<dyn InstallmentRepositoryTrait>,
        ledger: Arc<dyn LedgerRepositoryTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            ledger,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl InstallmentServiceTrait for InstallmentService {
    fn get_plan(&self, owner_id: &str, plan_id: &str) -> Result<InstallmentPlan> {
        self.repository.get_by_id(owner_id, plan_id)
    }

    fn list_plans(&self, owner_id: &str, query: InstallmentQuery) -> Result<Vec<InstallmentPlan>> {
        let plans = self.repository.list(owner_id, &query)?;
        Ok(match query.month {
            Some(month) => plans_due_in_month(plans, month),
            None => plans,
        })
    }

    fn list_plan_transactions(
        &self,
        owner_id: &str,
        plan_id: &str,
    ) -> Result<Vec<LedgerTransaction>> {
        // Resolve the plan first so foreign ids are reported as not found
        let plan = self.repository.get_by_id(owner_id, plan_id)?;
        self.ledger.list_for_plan(owner_id, &plan.id)
    }

    fn preview_schedule(&self, request: SchedulePreviewRequest) -> Result<SchedulePreview> {
        let now = request.as_of.unwrap_or_else(|| self.clock.today());
        preview_schedule(
            request.total_amount,
            request.period_count,
            request.start_date,
            request.payment_day,
            now,
        )
    }

    async fn create_plan(&self, new_plan: NewInstallmentPlan) -> Result<PlanChange> {
        let opening = open_plan(Uuid::new_v4().to_string(), new_plan, self.clock.today())?;
        let change = self.repository.create(opening).await?;
        info!(
            "Created installment plan {} with {} transaction(s)",
            change.plan.id,
            change.transactions.len()
        );
        Ok(change)
    }

    async fn update_plan(
        &self,
        owner_id: &str,
        plan_id: &str,
        update: InstallmentPlanUpdate,
    ) -> Result<InstallmentPlan> {
        retry_on_conflict("Update installment plan", move || {
            let update = update.clone();
            self.repository.update(
                owner_id,
                plan_id,
                Box::new(move |plan: &InstallmentPlan| apply_update(plan, update)),
            )
        })
        .await
    }

    async fn pay_next(
        &self,
        owner_id: &str,
        plan_id: &str,
        payment_date: Option<NaiveDate>,
    ) -> Result<PlanChange> {
        let change = retry_on_conflict("Pay installment", move || {
            self.repository.apply_progress(
                owner_id,
                plan_id,
                Box::new(move |plan: &InstallmentPlan| advance_one(plan, payment_date)),
            )
        })
        .await?;
        info!(
            "Paid installment {}/{} of plan {}",
            change.plan.paid_count, change.plan.period_count, change.plan.id
        );
        Ok(change)
    }

    async fn mark_paid(
        &self,
        owner_id: &str,
        plan_id: &str,
        target_paid_count: u32,
    ) -> Result<PlanChange> {
        let change = retry_on_conflict("Mark installments paid", move || {
            self.repository.apply_progress(
                owner_id,
                plan_id,
                Box::new(move |plan: &InstallmentPlan| advance_to(plan, target_paid_count)),
            )
        })
        .await?;
        info!(
            "Marked plan {} paid through {}/{} ({} new transaction(s))",
            change.plan.id,
            change.plan.paid_count,
            change.plan.period_count,
            change.transactions.len()
        );
        Ok(change)
    }

    async fn cancel_plan(&self, owner_id: &str, plan_id: &str) -> Result<InstallmentPlan> {
        let change = retry_on_conflict("Cancel installment plan", move || {
            self.repository.apply_progress(owner_id, plan_id, Box::new(cancel))
        })
        .await?;
        info!("Cancelled installment plan {}", change.plan.id);
        Ok(change.plan)
    }

    async fn delete_plan(&self, owner_id: &str, plan_id: &str) -> Result<()> {
        let deleted = self.repository.delete(owner_id, plan_id).await?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound(format!("Installment plan {}", plan_id)).into());
        }
        debug!("Deleted installment plan {}", plan_id);
        Ok(())
    }
}
