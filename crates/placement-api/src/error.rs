use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use placement_store::StoreError;
use placement_types::api::ErrorBody;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required form field was missing or blank.
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(String),

    /// The remote store rejected an insert. `message` is what the user sees;
    /// the same request may be retried unchanged.
    #[error("{message}")]
    Insert {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Insert { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Adapter for `map_err` on store inserts.
    pub fn insert(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Insert { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Insert { source, .. } = &self {
            warn!("Insert into {} failed: {}", source.collection(), source);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
