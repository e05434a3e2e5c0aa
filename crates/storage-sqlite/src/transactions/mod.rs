//! SQLite storage implementation for the ledger.

mod model;
mod repository;

pub use model::LedgerTransactionDB;
pub use repository::LedgerRepository;

pub(crate) use repository::{insert_ledger_rows, to_domain};
