//! SQLite storage implementation for Ledgerline.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `ledgerline-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for plans, recurring expenses and the ledger
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! Every write runs on the single writer actor inside an `IMMEDIATE`
//! transaction; reads go through the r2d2 pool.
//!
//! ```text
//!   core (domain, traits)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod installments;
pub mod recurring;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from ledgerline-core for convenience
pub use ledgerline_core::errors::{DatabaseError, Error, Result};
