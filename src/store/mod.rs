//! Persistence ports for users and polls.
//!
//! Handlers only see the [`CredentialStore`] and [`PollStore`] traits, so the
//! same router runs against PostgreSQL in production and against
//! [`MemoryStore`] in tests or when no database is configured.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Poll, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username {0:?} is already registered")]
    UsernameTaken(String),

    #[error("poll {0} not found")]
    PollNotFound(Uuid),

    #[error("option index {index} out of range for poll with {len} options")]
    OptionOutOfRange { index: i64, len: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Usernames are unique.
    async fn save(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait PollStore: Send + Sync {
    /// Insert a new poll with every option's vote count at zero.
    async fn save(
        &self,
        question: &str,
        options: &[String],
        created_by: &str,
    ) -> Result<Poll, StoreError>;

    /// All polls, oldest first.
    async fn find_all(&self) -> Result<Vec<Poll>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Poll>, StoreError>;

    /// Atomically add one vote to `options[option_index]` and return the poll
    /// as it stands afterwards.
    async fn record_vote(&self, id: Uuid, option_index: i64) -> Result<Poll, StoreError>;
}
