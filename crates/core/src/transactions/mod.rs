//! Transactions module - ledger entries produced by the scheduling engines.

mod idempotency;
mod transactions_model;
mod transactions_traits;

pub use idempotency::{installment_key, recurring_key};
pub use transactions_model::{LedgerTransaction, NewLedgerTransaction, TransactionSource};
pub use transactions_traits::LedgerRepositoryTrait;
