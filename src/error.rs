// src/error.rs
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{auth::AuthError, config::ConfigError, store::StoreError};

/// Failures that stop the server before or while it serves.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No token, auth denied")]
    MissingToken,

    #[error("Token invalid")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Poll not found")]
    PollNotFound,

    #[error("Option index out of range")]
    InvalidOption,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials
            | AppError::InvalidOption
            | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::PollNotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => AppError::UsernameTaken,
            StoreError::PollNotFound(_) => AppError::PollNotFound,
            StoreError::OptionOutOfRange { .. } => AppError::InvalidOption,
            StoreError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => AppError::InvalidToken,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(detail) => error!("Request failed: {detail}"),
            other => warn!(%status, "Request rejected: {other}"),
        }

        (status, Json(json!({ "msg": self.to_string() }))).into_response()
    }
}
