use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bilancia_core::ErrorBody;
use thiserror::Error;

/// Tassonomia degli errori esposti dalle rotte. Ogni variante viene mappata
/// al bordo in status HTTP + corpo JSON; nessun errore fa cadere il processo.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Campo obbligatorio mancante o malformato: respinto prima di qualsiasi I/O.
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    /// Nessun account per lo username dichiarato: distinto dal diniego RFID.
    #[error("User security profile not found.")]
    ProfileNotFound,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Security Clearance Denied: RFID Mismatch.")]
    RfidMismatch,

    #[error("db error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, success) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, Some(false)),
            ApiError::DuplicateUsername => (StatusCode::BAD_REQUEST, Some(false)),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, Some(false)),
            ApiError::ProfileNotFound => (StatusCode::NOT_FOUND, None),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, Some(false)),
            ApiError::RfidMismatch => (StatusCode::FORBIDDEN, Some(false)),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorBody {
            success,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
