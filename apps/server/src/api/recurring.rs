use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::{
    auth::Owner,
    error::ApiResult,
    main_lib::AppState,
    models::{
        GenerateAllResponse, GenerateRequest, GenerateResponse, MessageResponse, NewRecurring,
        RecurringExpenseDto, RecurringListQuery, RecurringUpdate, ToggleRequest, Transaction,
    },
};

async fn list_recurring_expenses(
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    query: Result<Query<RecurringListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RecurringExpenseDto>>> {
    let Query(query) = query?;
    let expenses = state.recurring_service.list_expenses(&owner, query.active)?;
    Ok(Json(expenses.into_iter().map(RecurringExpenseDto::from).collect()))
}

async fn get_recurring_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<RecurringExpenseDto>> {
    let expense = state.recurring_service.get_expense(&owner, &id)?;
    Ok(Json(expense.into()))
}

async fn list_recurring_transactions(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state
        .recurring_service
        .list_expense_transactions(&owner, &id)?;
    Ok(Json(transactions.into_iter().map(Transaction::from).collect()))
}

async fn create_recurring_expense(
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<NewRecurring>, JsonRejection>,
) -> ApiResult<Json<RecurringExpenseDto>> {
    let Json(payload) = payload?;
    let expense = state
        .recurring_service
        .create_expense(payload.into_domain(owner))
        .await?;
    Ok(Json(expense.into()))
}

async fn update_recurring_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<RecurringUpdate>, JsonRejection>,
) -> ApiResult<Json<RecurringExpenseDto>> {
    let Json(payload) = payload?;
    let expense = state
        .recurring_service
        .update_expense(&owner, &id, payload.into())
        .await?;
    Ok(Json(expense.into()))
}

async fn toggle_recurring_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<ToggleRequest>, JsonRejection>,
) -> ApiResult<Json<RecurringExpenseDto>> {
    let Json(payload) = payload?;
    let expense = state
        .recurring_service
        .toggle_expense(&owner, &id, payload.is_active)
        .await?;
    Ok(Json(expense.into()))
}

async fn delete_recurring_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<MessageResponse>> {
    state.recurring_service.delete_expense(&owner, &id).await?;
    Ok(Json(MessageResponse {
        message: "Recurring expense deleted".to_string(),
    }))
}

async fn generate_recurring_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(payload) = payload?;
    let result = state
        .recurring_service
        .generate(&owner, &id, payload.month, payload.year)
        .await?;
    let message = format!(
        "Generated {} for {:02}/{}",
        result.expense.description, payload.month, payload.year
    );
    Ok(Json(GenerateResponse {
        recurring_expense: result.expense.into(),
        transaction: result.transaction.into(),
        message,
    }))
}

async fn generate_all_recurring_expenses(
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateAllResponse>> {
    let Json(payload) = payload?;
    let batch = state
        .recurring_service
        .generate_all(&owner, payload.month, payload.year)
        .await?;
    let generated = batch.transactions.len();
    let skipped = batch.skipped.len();
    Ok(Json(GenerateAllResponse {
        transactions: batch.transactions.into_iter().map(Transaction::from).collect(),
        generated,
        skipped,
        message: format!(
            "Generated {} recurring expense(s) for {}, {} already generated",
            generated, batch.period, skipped
        ),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recurring-expenses",
            get(list_recurring_expenses).post(create_recurring_expense),
        )
        .route(
            "/recurring-expenses/generate-all",
            post(generate_all_recurring_expenses),
        )
        .route(
            "/recurring-expenses/{id}",
            get(get_recurring_expense)
                .put(update_recurring_expense)
                .delete(delete_recurring_expense),
        )
        .route(
            "/recurring-expenses/{id}/transactions",
            get(list_recurring_transactions),
        )
        .route(
            "/recurring-expenses/{id}/toggle",
            put(toggle_recurring_expense),
        )
        .route(
            "/recurring-expenses/{id}/generate",
            post(generate_recurring_expense),
        )
}
