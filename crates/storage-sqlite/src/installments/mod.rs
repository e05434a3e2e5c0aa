//! SQLite storage implementation for installment plans.

mod model;
mod repository;

pub use model::{InstallmentPlanDB, InstallmentPlanTermsDB};
pub use repository::InstallmentRepository;
