//! SQLite storage implementation for recurring expenses.

mod model;
mod repository;

pub use model::{RecurringExpenseChangesDB, RecurringExpenseDB};
pub use repository::RecurringExpenseRepository;
