//! Installments module - plan models, the lifecycle engine, services, and traits.

mod installments_engine;
mod installments_errors;
mod installments_model;
mod installments_service;
mod installments_traits;


pub use installments_engine::{
    advance_one, advance_to, apply_update, cancel, open_plan, plans_due_in_month,
    preview_schedule, validate_terms,
};
pub use installments_errors::InstallmentError;
pub use installments_model::{
    InitialPaidCount, InstallmentPlan, InstallmentPlanUpdate, InstallmentQuery,
    InstallmentStatus, NewInstallmentPlan, PlanChange, PlanDraft, PlanOpening, PlanProgress,
    PreviewPeriod, ProgressStamp, SchedulePreview, SchedulePreviewRequest,
};
pub use installments_service::InstallmentService;
pub use installments_traits::{
    InstallmentRepositoryTrait, InstallmentServiceTrait, PlanEdit, ProgressStep,
};
