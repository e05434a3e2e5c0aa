//! Recurring module - monthly expense definitions and their generation.

mod recurring_engine;
mod recurring_errors;
mod recurring_model;
mod recurring_service;
mod recurring_traits;

#[cfg(test)]
mod recurring_service_tests;

pub use recurring_engine::{
    apply_update, generation_period, plan_generation, prepare_new, validate_definition,
};
pub use recurring_errors::RecurringError;
pub use recurring_model::{
    GenerationBatch, GenerationResult, NewRecurringExpense, RecurringExpense,
    RecurringExpenseUpdate, RecurringGeneration,
};
pub use recurring_service::RecurringExpenseService;
pub use recurring_traits::{
    ExpenseEdit, GenerationStep, RecurringExpenseRepositoryTrait, RecurringExpenseServiceTrait,
};
