//! Access guard for protected routes.
//!
//! [`AuthUser`] is an extractor: a handler that takes it only runs once the
//! `Authorization` header has been verified. The header value is the token
//! itself, with no `Bearer ` scheme.

use axum::{extract::FromRequestParts, http::request::Parts};
use http::header::AUTHORIZATION;
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// Identity decoded from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(AppError::MissingToken)?;

        let claims = state.auth.decode_token(token)?;
        debug!(user = %claims.id, "Token accepted");

        Ok(AuthUser { id: claims.id })
    }
}
