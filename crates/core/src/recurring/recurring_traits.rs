//! Recurring expense repository and service traits.

use async_trait::async_trait;

use super::recurring_model::{
    GenerationBatch, GenerationResult, NewRecurringExpense, RecurringExpense,
    RecurringExpenseUpdate, RecurringGeneration,
};
use crate::errors::Result;
use crate::transactions::LedgerTransaction;

/// Computes the edited definition from the definition as currently stored.
pub type ExpenseEdit = Box<dyn FnOnce(&RecurringExpense) -> Result<RecurringExpense> + Send>;

/// Computes a month's generation from the definition as currently stored.
pub type GenerationStep = Box<dyn FnOnce(&RecurringExpense) -> Result<RecurringGeneration> + Send>;

/// Trait defining the contract for recurring expense persistence.
///
/// Like installment plans, mutations load the stored definition, run the
/// given closure and write its result as one serialized step.
#[async_trait]
pub trait RecurringExpenseRepositoryTrait: Send + Sync {
    /// Retrieves a definition owned by `owner_id`. Foreign ids are reported as not found.
    fn get_by_id(&self, owner_id: &str, expense_id: &str) -> Result<RecurringExpense>;

    /// Lists the owner's definitions, optionally only active or inactive ones.
    fn list(&self, owner_id: &str, is_active: Option<bool>) -> Result<Vec<RecurringExpense>>;

    /// Inserts a definition, assigning its id.
    async fn create(&self, new_expense: NewRecurringExpense) -> Result<RecurringExpense>;

    /// Loads the definition, applies `edit` and writes descriptive fields and
    /// the active flag. Generation history is left as stored.
    async fn update(
        &self,
        owner_id: &str,
        expense_id: &str,
        edit: ExpenseEdit,
    ) -> Result<RecurringExpense>;

    /// Loads the definition, computes a generation with `step`, then inserts
    /// the transaction and moves `last_generated_period`.
    ///
    /// Errors from `step` are returned as-is. Fails with `AlreadyGenerated` if
    /// the month's idempotency key exists, or with a concurrent-modification
    /// error if the stored period no longer matches `generation.expected_last`.
    /// Nothing is committed on failure.
    async fn record_generation(
        &self,
        owner_id: &str,
        expense_id: &str,
        step: GenerationStep,
    ) -> Result<GenerationResult>;

    /// Deletes a definition. Its ledger transactions are kept.
    async fn delete(&self, owner_id: &str, expense_id: &str) -> Result<usize>;
}

/// Trait defining the contract for recurring expense operations.
#[async_trait]
pub trait RecurringExpenseServiceTrait: Send + Sync {
    fn get_expense(&self, owner_id: &str, expense_id: &str) -> Result<RecurringExpense>;

    fn list_expenses(&self, owner_id: &str, is_active: Option<bool>)
        -> Result<Vec<RecurringExpense>>;

    fn list_expense_transactions(
        &self,
        owner_id: &str,
        expense_id: &str,
    ) -> Result<Vec<LedgerTransaction>>;

    async fn create_expense(&self, new_expense: NewRecurringExpense) -> Result<RecurringExpense>;

    async fn update_expense(
        &self,
        owner_id: &str,
        expense_id: &str,
        update: RecurringExpenseUpdate,
    ) -> Result<RecurringExpense>;

    /// Flips the active flag. Past transactions are not touched.
    async fn toggle_expense(
        &self,
        owner_id: &str,
        expense_id: &str,
        is_active: bool,
    ) -> Result<RecurringExpense>;

    async fn delete_expense(&self, owner_id: &str, expense_id: &str) -> Result<()>;

    /// Generates one definition's transaction for `month`/`year`.
    async fn generate(
        &self,
        owner_id: &str,
        expense_id: &str,
        month: u32,
        year: i32,
    ) -> Result<GenerationResult>;

    /// Generates every active definition of the owner, skipping months already generated.
    async fn generate_all(&self, owner_id: &str, month: u32, year: i32)
        -> Result<GenerationBatch>;
}
