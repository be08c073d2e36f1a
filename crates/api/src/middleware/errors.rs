//! Development-mode error detail.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::{envelope, InternalErrorDetail};
use crate::state::AppState;

/// Middleware: in development mode, replace the generic 500 message with the
/// [`InternalErrorDetail`] the error carried. Other responses pass through.
pub async fn reveal_internal_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.config.environment.is_development() {
        return response;
    }

    match response.extensions().get::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => {
            envelope(StatusCode::INTERNAL_SERVER_ERROR, detail.clone(), None)
        }
        None => response,
    }
}
