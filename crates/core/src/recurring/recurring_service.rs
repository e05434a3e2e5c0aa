use std::sync::Arc;

use log::{debug, info};

use super::recurring_engine::{apply_update, generation_period, plan_generation, prepare_new};
use super::recurring_errors::RecurringError;
use super::recurring_model::{
    GenerationBatch, GenerationResult, NewRecurringExpense, RecurringExpense,
    RecurringExpenseUpdate,
};
use super::recurring_traits::{RecurringExpenseRepositoryTrait, RecurringExpenseServiceTrait};
use crate::errors::{DatabaseError, Result};
use crate::schedule::YearMonth;
use crate::transactions::{LedgerRepositoryTrait, LedgerTransaction};
use crate::utils::retry_on_conflict;
use crate::Error;

/// Service for managing recurring expenses.
pub struct RecurringExpenseService {
    repository: Arc<dyn RecurringExpenseRepositoryTrait>,
    ledger: Arc<dyn LedgerRepositoryTrait>,
}

impl RecurringExpenseService {
    pub fn new(
        repository: Arc<dyn RecurringExpenseRepositoryTrait>,
        ledger: Arc<dyn LedgerRepositoryTrait>,
    ) -> Self {
        Self { repository, ledger }
    }

    async fn generate_period(
        &self,
        owner_id: &str,
        expense_id: &str,
        period: YearMonth,
    ) -> Result<GenerationResult> {
        retry_on_conflict("Generate recurring expense", move || async move {
            // Fail fast on the snapshot; the writer recomputes against stored state
            let expense = self.repository.get_by_id(owner_id, expense_id)?;
            let generation = plan_generation(&expense, period)?;
            if self.ledger.exists_by_key(&generation.transaction.idempotency_key)? {
                return Err(RecurringError::AlreadyGenerated {
                    expense_id: expense.id,
                    period,
                }
                .into());
            }
            self.repository
                .record_generation(
                    owner_id,
                    expense_id,
                    Box::new(move |stored: &RecurringExpense| plan_generation(stored, period)),
                )
                .await
        })
        .await
    }
}

#[async_trait::async_trait]
impl RecurringExpenseServiceTrait for RecurringExpenseService {
    fn get_expense(&self, owner_id: &str, expense_id: &str) -> Result<RecurringExpense> {
        self.repository.get_by_id(owner_id, expense_id)
    }

    fn list_expenses(
        &self,
        owner_id: &str,
        is_active: Option<bool>,
    ) -> Result<Vec<RecurringExpense>> {
        self.repository.list(owner_id, is_active)
    }

    fn list_expense_transactions(
        &self,
        owner_id: &str,
        expense_id: &str,
    ) -> Result<Vec<LedgerTransaction>> {
        let expense = self.repository.get_by_id(owner_id, expense_id)?;
        self.ledger.list_for_recurring(owner_id, &expense.id)
    }

    async fn create_expense(&self, new_expense: NewRecurringExpense) -> Result<RecurringExpense> {
        let expense = self.repository.create(prepare_new(new_expense)?).await?;
        info!("Created recurring expense {}", expense.id);
        Ok(expense)
    }

    async fn update_expense(
        &self,
        owner_id: &str,
        expense_id: &str,
        update: RecurringExpenseUpdate,
    ) -> Result<RecurringExpense> {
        self.repository
            .update(
                owner_id,
                expense_id,
                Box::new(move |expense: &RecurringExpense| apply_update(expense, update)),
            )
            .await
    }

    async fn toggle_expense(
        &self,
        owner_id: &str,
        expense_id: &str,
        is_active: bool,
    ) -> Result<RecurringExpense> {
        let update = RecurringExpenseUpdate {
            is_active: Some(is_active),
            ..Default::default()
        };
        let expense = self.update_expense(owner_id, expense_id, update).await?;
        debug!("Recurring expense {} active: {}", expense.id, expense.is_active);
        Ok(expense)
    }

    async fn delete_expense(&self, owner_id: &str, expense_id: &str) -> Result<()> {
        let deleted = self.repository.delete(owner_id, expense_id).await?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound(format!("Recurring expense {}", expense_id)).into());
        }
        Ok(())
    }

    async fn generate(
        &self,
        owner_id: &str,
        expense_id: &str,
        month: u32,
        year: i32,
    ) -> Result<GenerationResult> {
        let period = generation_period(month, year)?;
        let result = self.generate_period(owner_id, expense_id, period).await?;
        info!("Generated recurring expense {} for {}", expense_id, period);
        Ok(result)
    }

    async fn generate_all(&self, owner_id: &str, month: u32, year: i32) -> Result<GenerationBatch> {
        let period = generation_period(month, year)?;
        let expenses = self.repository.list(owner_id, Some(true))?;

        let mut batch = GenerationBatch {
            period,
            transactions: Vec::new(),
            skipped: Vec::new(),
        };
        for expense in expenses {
            match self.generate_period(owner_id, &expense.id, period).await {
                Ok(result) => batch.transactions.push(result.transaction),
                Err(Error::Recurring(RecurringError::AlreadyGenerated { .. })) => {
                    debug!("Skipping recurring expense {} for {}", expense.id, period);
                    batch.skipped.push(expense.id);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Generated {} recurring expense(s) for {}, skipped {}",
            batch.transactions.len(),
            period,
            batch.skipped.len()
        );
        Ok(batch)
    }
}
