// src/store/postgres.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, PollStore, StoreError};
use crate::models::{Poll, PollOption, User};

#[derive(sqlx::FromRow)]
struct PollRow {
    id: Uuid,
    question: String,
    created_by: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OptionRow {
    poll_id: Uuid,
    text: String,
    votes: i64,
}

impl PollRow {
    fn into_poll(self, options: Vec<PollOption>) -> Poll {
        Poll {
            id: self.id,
            question: self.question,
            options,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL-backed store. Options live in their own table keyed by
/// `(poll_id, position)` so a vote is a single-row `UPDATE`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn options_for(&self, poll_id: Uuid) -> Result<Vec<PollOption>, StoreError> {
        let rows = sqlx::query_as::<_, OptionRow>(
            "SELECT poll_id, text, votes FROM poll_options WHERE poll_id = $1 ORDER BY position",
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PollOption {
                text: row.text,
                votes: row.votes,
            })
            .collect())
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn save(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                StoreError::UsernameTaken(username.to_string())
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn save(
        &self,
        question: &str,
        options: &[String],
        created_by: &str,
    ) -> Result<Poll, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PollRow>(
            r#"
            INSERT INTO polls (id, question, created_by, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for (position, text) in (0_i32..).zip(options) {
            sqlx::query(
                "INSERT INTO poll_options (poll_id, position, text, votes) VALUES ($1, $2, $3, 0)",
            )
            .bind(row.id)
            .bind(position)
            .bind(text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into_poll(options.iter().map(PollOption::new).collect()))
    }

    async fn find_all(&self) -> Result<Vec<Poll>, StoreError> {
        let polls = sqlx::query_as::<_, PollRow>(
            "SELECT id, question, created_by, created_at FROM polls ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let option_rows = sqlx::query_as::<_, OptionRow>(
            "SELECT poll_id, text, votes FROM poll_options ORDER BY poll_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut options: HashMap<Uuid, Vec<PollOption>> = HashMap::new();
        for row in option_rows {
            options.entry(row.poll_id).or_default().push(PollOption {
                text: row.text,
                votes: row.votes,
            });
        }

        Ok(polls
            .into_iter()
            .map(|row| {
                let poll_options = options.remove(&row.id).unwrap_or_default();
                row.into_poll(poll_options)
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Poll>, StoreError> {
        let row = sqlx::query_as::<_, PollRow>(
            "SELECT id, question, created_by, created_at FROM polls WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let options = self.options_for(row.id).await?;
                Ok(Some(row.into_poll(options)))
            }
            None => Ok(None),
        }
    }

    async fn record_vote(&self, id: Uuid, option_index: i64) -> Result<Poll, StoreError> {
        // Single-row increment in the database; concurrent votes all count.
        let updated = match i32::try_from(option_index) {
            Ok(position) => sqlx::query(
                "UPDATE poll_options SET votes = votes + 1 WHERE poll_id = $1 AND position = $2",
            )
            .bind(id)
            .bind(position)
            .execute(&self.pool)
            .await?
            .rows_affected(),
            Err(_) => 0,
        };

        let poll = self.find_by_id(id).await?.ok_or(StoreError::PollNotFound(id))?;
        if updated == 0 {
            return Err(StoreError::OptionOutOfRange {
                index: option_index,
                len: poll.options.len(),
            });
        }

        Ok(poll)
    }
}
