//! Ledger read contract.

use super::transactions_model::LedgerTransaction;
use crate::errors::Result;

/// Read access to generated ledger transactions.
///
/// Writes happen through the installment and recurring repositories so that
/// ledger inserts commit together with the progress counters.
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Transactions generated by one installment plan, in period order.
    fn list_for_plan(&self, owner_id: &str, plan_id: &str) -> Result<Vec<LedgerTransaction>>;

    /// Transactions generated by one recurring expense, oldest month first.
    fn list_for_recurring(&self, owner_id: &str, expense_id: &str)
        -> Result<Vec<LedgerTransaction>>;

    /// Whether a transaction with this idempotency key has been written.
    fn exists_by_key(&self, idempotency_key: &str) -> Result<bool>;
}
