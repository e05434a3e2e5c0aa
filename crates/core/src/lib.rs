//! Ledgerline Core - Domain entities, services, and traits.
//!
//! This crate contains the scheduling logic for installment plans and
//! recurring expenses. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod installments;
pub mod recurring;
pub mod schedule;
pub mod transactions;
pub mod utils;

// Re-export the shared schedule primitives
pub use schedule::{days_in_month, elapsed_periods, period_date, YearMonth};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
