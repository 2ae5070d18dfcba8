//! Password hashing and identity tokens.
//!
//! Passwords are stored as Argon2 PHC strings with a fresh 16-byte salt per
//! hash. Tokens are HS256 JWTs carrying the user id, valid for the configured
//! lifetime with no expiry leeway.

use std::time::Duration;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token signing failed: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct Authenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(signing_key: &str, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_key.as_bytes()),
            token_ttl,
        }
    }

    /// Runs on the blocking pool.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&password)).await?
    }

    pub async fn verify_password(&self, password: &str, digest: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let digest = digest.to_owned();
        Ok(tokio::task::spawn_blocking(move || verify_password(&digest, &password)).await?)
    }

    pub fn issue_token(&self, id: &str) -> Result<String, AuthError> {
        self.issue_token_at(id, Utc::now())
    }

    fn issue_token_at(&self, id: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        let iat = issued_at.timestamp();
        let claims = Claims {
            id: id.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(digest: &str, password: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new("test-secret", Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn verifies_its_own_hash() {
        let auth = authenticator();
        let digest = auth.hash_password("pw1").await.unwrap();

        assert_ne!(digest, "pw1");
        assert!(auth.verify_password("pw1", &digest).await.unwrap());
        assert!(!auth.verify_password("pw2", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn salts_every_hash() {
        let auth = authenticator();
        let first = auth.hash_password("same").await.unwrap();
        let second = auth.hash_password("same").await.unwrap();

        assert_ne!(first, second);
        assert!(auth.verify_password("same", &second).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_digest_never_verifies() {
        let auth = authenticator();
        assert!(!auth.verify_password("pw", "not-a-phc-string").await.unwrap());
    }

    #[test]
    fn token_round_trips_identity() {
        let auth = authenticator();
        let token = auth.issue_token("user-42").unwrap();
        let claims = auth.decode_token(&token).unwrap();

        assert_eq!(claims.id, "user-42");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = authenticator();
        let two_hours_ago = Utc::now() - chrono::Duration::hours(2);
        let token = auth.issue_token_at("user-42", two_hours_ago).unwrap();

        assert!(matches!(auth.decode_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let other = Authenticator::new("other-secret", Duration::from_secs(3600));
        let token = other.issue_token("user-42").unwrap();

        assert!(matches!(
            authenticator().decode_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            authenticator().decode_token("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
