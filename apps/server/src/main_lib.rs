use std::sync::Arc;

use ledgerline_core::installments::{InstallmentService, InstallmentServiceTrait};
use ledgerline_core::recurring::{RecurringExpenseService, RecurringExpenseServiceTrait};
use ledgerline_core::utils::{Clock, SystemClock};
use ledgerline_storage_sqlite::{
    db::{self, write_actor},
    installments::InstallmentRepository,
    recurring::RecurringExpenseRepository,
    transactions::LedgerRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub installment_service: Arc<dyn InstallmentServiceTrait>,
    pub recurring_service: Arc<dyn RecurringExpenseServiceTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("LL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also forwards `log` records from the library crates
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_clock(config, Arc::new(SystemClock::new(config.timezone))).await
}

/// Builds the application state with an explicit source of "today".
pub async fn build_state_with_clock(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer(pool.clone())?;

    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone()));
    let installment_repository = Arc::new(InstallmentRepository::new(pool.clone(), writer.clone()));
    let recurring_repository = Arc::new(RecurringExpenseRepository::new(pool.clone(), writer));

    let installment_service: Arc<dyn InstallmentServiceTrait> = Arc::new(InstallmentService::new(
        installment_repository,
        ledger_repository.clone(),
        clock,
    ));
    let recurring_service: Arc<dyn RecurringExpenseServiceTrait> = Arc::new(
        RecurringExpenseService::new(recurring_repository, ledger_repository),
    );

    Ok(Arc::new(AppState {
        installment_service,
        recurring_service,
        auth: Arc::new(AuthManager::new(&config.jwt_secret)),
    }))
}
