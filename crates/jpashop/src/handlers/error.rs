use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jpashop_core::storage::RepositoryError;

pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Storage errors choose their own status; anything else is a 500.
    fn status_code(&self) -> StatusCode {
        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(RepositoryError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            Some(RepositoryError::ConnectionFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Some(RepositoryError::InvalidData(_)) => StatusCode::BAD_REQUEST,
            Some(RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_)) | None => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = %status_code, error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
