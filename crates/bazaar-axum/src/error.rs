//! Rejection type for the middleware stages and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bazaar_auth_core::AuthError;
use bazaar_types::ErrorBody;

/// An [`AuthError`] rendered as the JSON error envelope.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AuthRejection(#[from] pub AuthError);

impl AuthRejection {
    /// Admin gate rejection
    #[must_use]
    pub fn forbidden() -> Self {
        Self(AuthError::Forbidden)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Identity resolution failed");
        } else {
            tracing::debug!(code = self.0.error_code(), "Request rejected");
        }

        let body = ErrorBody::new(self.0.error_code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}
