use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::{CoreError, FieldError};
use serde_json::json;

/// Message returned for every request-body validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";
/// Message returned for every 500 outside development mode.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// The real cause of a 500, carried as a response extension.
///
/// The envelope always says [`INTERNAL_SERVER_ERROR`]; the
/// [`reveal_internal_errors`](crate::middleware::errors::reveal_internal_errors)
/// middleware swaps this in when running in development mode.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{success: false, ...}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Request DTO failed its `validator` rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The body could not be parsed as the expected JSON.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// A path parameter could not be parsed.
    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    /// No route matches the request URI.
    #[error("Not Found - {0}")]
    RouteNotFound(String),

    /// An internal error with a human-readable message (never sent to clients).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::debug!(entity, id, "Entity not found");
                    (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
                }
                CoreError::Validation(fields) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    VALIDATION_FAILED.to_string(),
                    Some(fields),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    return internal_response(msg);
                }
            },

            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                VALIDATION_FAILED.to_string(),
                Some(field_errors(&errors)),
            ),

            AppError::MalformedBody(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                VALIDATION_FAILED.to_string(),
                Some(vec![FieldError::new("body", reason)]),
            ),

            AppError::InvalidPath(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                VALIDATION_FAILED.to_string(),
                Some(vec![FieldError::new("id", reason)]),
            ),

            AppError::RouteNotFound(uri) => {
                (StatusCode::NOT_FOUND, format!("Not Found - {uri}"), None)
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                return internal_response(msg);
            }
        };

        envelope(status, message, details)
    }
}

/// Build the `{success: false, message, details?}` error body.
pub(crate) fn envelope(
    status: StatusCode,
    message: String,
    details: Option<Vec<FieldError>>,
) -> Response {
    let body = match details {
        Some(details) => json!({
            "success": false,
            "message": message,
            "details": details,
        }),
        None => json!({
            "success": false,
            "message": message,
        }),
    };

    (status, axum::Json(body)).into_response()
}

fn internal_response(detail: String) -> Response {
    let mut response = envelope(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR.to_string(),
        None,
    );
    response.extensions_mut().insert(InternalErrorDetail(detail));
    response
}

/// Flatten `validator` errors into `{path, message}` pairs, sorted by path.
fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.path.cmp(&b.path));
    fields
}
