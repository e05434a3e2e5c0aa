use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Extension, Json, Router,
};
use ledgerline_core::installments::{InstallmentQuery, InstallmentStatus, SchedulePreview, SchedulePreviewRequest};
use ledgerline_core::YearMonth;

use crate::{
    auth::Owner,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{
        Installment, InstallmentChangeResponse, InstallmentListQuery, InstallmentUpdate,
        MarkPaidRequest, MessageResponse, NewInstallment, PayRequest, PaymentResponse,
        PreviewQuery, Transaction,
    },
};

fn parse_list_query(query: InstallmentListQuery) -> ApiResult<InstallmentQuery> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(InstallmentStatus::from_str)
        .transpose()
        .map_err(|e| ApiError::field("status", e.to_string()))?;
    let month = query
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(|m| YearMonth::from_str(m.trim()))
        .transpose()
        .map_err(|e| ApiError::field("month", e.to_string()))?;
    Ok(InstallmentQuery {
        status,
        group_id: query.group_id.filter(|g| !g.trim().is_empty()),
        month,
    })
}

async fn list_installments(
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    query: Result<Query<InstallmentListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Installment>>> {
    let Query(query) = query?;
    let plans = state
        .installment_service
        .list_plans(&owner, parse_list_query(query)?)?;
    Ok(Json(plans.into_iter().map(Installment::from).collect()))
}

async fn preview_installments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> ApiResult<Json<SchedulePreview>> {
    let Query(query) = query?;
    let preview = state.installment_service.preview_schedule(SchedulePreviewRequest {
        total_amount: query.total_amount,
        period_count: query.installments,
        start_date: query.start_date,
        payment_day: query.payment_day,
        as_of: query.as_of,
    })?;
    Ok(Json(preview))
}

async fn get_installment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<Installment>> {
    let plan = state.installment_service.get_plan(&owner, &id)?;
    Ok(Json(plan.into()))
}

async fn list_installment_transactions(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.installment_service.list_plan_transactions(&owner, &id)?;
    Ok(Json(transactions.into_iter().map(Transaction::from).collect()))
}

async fn create_installment(
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<NewInstallment>, JsonRejection>,
) -> ApiResult<Json<InstallmentChangeResponse>> {
    let Json(payload) = payload?;
    let change = state
        .installment_service
        .create_plan(payload.into_domain(owner))
        .await?;
    let message = match change.transactions.len() {
        0 => "Installment plan created".to_string(),
        n => format!("Installment plan created with {} paid installment(s)", n),
    };
    Ok(Json(InstallmentChangeResponse::new(change, message)))
}

async fn update_installment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<InstallmentUpdate>, JsonRejection>,
) -> ApiResult<Json<Installment>> {
    let Json(payload) = payload?;
    let plan = state
        .installment_service
        .update_plan(&owner, &id, payload.into())
        .await?;
    Ok(Json(plan.into()))
}

async fn pay_installment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    body: Bytes,
) -> ApiResult<Json<PaymentResponse>> {
    // The body is optional; an empty one pays on the scheduled date
    let request: PayRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PayRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let change = state
        .installment_service
        .pay_next(&owner, &id, request.payment_date)
        .await?;
    let message = format!(
        "Installment {}/{} paid",
        change.plan.paid_count, change.plan.period_count
    );
    Ok(Json(PaymentResponse {
        transaction: change.transactions.into_iter().next().map(Transaction::from),
        installment: change.plan.into(),
        message,
    }))
}

async fn mark_installments_paid(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
    payload: Result<Json<MarkPaidRequest>, JsonRejection>,
) -> ApiResult<Json<InstallmentChangeResponse>> {
    let Json(payload) = payload?;
    let change = state
        .installment_service
        .mark_paid(&owner, &id, payload.paid_count)
        .await?;
    let message = format!(
        "{} installment(s) marked as paid",
        change.transactions.len()
    );
    Ok(Json(InstallmentChangeResponse::new(change, message)))
}

async fn cancel_installment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<Installment>> {
    let plan = state.installment_service.cancel_plan(&owner, &id).await?;
    Ok(Json(plan.into()))
}

async fn delete_installment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(Owner(owner)): Extension<Owner>,
) -> ApiResult<Json<MessageResponse>> {
    state.installment_service.delete_plan(&owner, &id).await?;
    Ok(Json(MessageResponse {
        message: "Installment plan deleted".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/installments",
            get(list_installments).post(create_installment),
        )
        .route("/installments/preview", get(preview_installments))
        .route(
            "/installments/{id}",
            get(get_installment)
                .put(update_installment)
                .delete(delete_installment),
        )
        .route(
            "/installments/{id}/transactions",
            get(list_installment_transactions),
        )
        .route("/installments/{id}/pay", put(pay_installment))
        .route("/installments/{id}/mark-paid", put(mark_installments_paid))
        .route("/installments/{id}/cancel", put(cancel_installment))
}
