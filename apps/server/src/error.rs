use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledgerline_core::errors::{Error as CoreError, ErrorKind, FieldError};
use serde::Serialize;
use thiserror::Error;

use crate::models::wire_field_name;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// A request that failed validation on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Validation {
            errors: vec![FieldError::new(field, message.clone())],
            message,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::StateConflict => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Concurrency => StatusCode::CONFLICT,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn domain_code(err: &CoreError) -> Option<&'static str> {
    match err {
        CoreError::Installment(e) => Some(e.code()),
        CoreError::Recurring(e) => Some(e.code()),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, errors) = match self {
            ApiError::Core(e) => {
                let status = status_for(e.kind());
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Request failed: {}", e);
                }
                let errors = e
                    .field_errors()
                    .into_iter()
                    .map(|f| FieldError::new(wire_field_name(&f.field), f.message))
                    .collect();
                (status, domain_code(&e), e.to_string(), errors)
            }
            ApiError::Validation { message, errors } => {
                (StatusCode::BAD_REQUEST, Some("VALIDATION"), message, errors)
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, None, message, Vec::new()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            error_code,
            message,
            errors,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
