// src/store/memory.rs
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, PollStore, StoreError};
use crate::models::{Poll, PollOption, User};

/// In-process store. Each collection sits behind its own lock; votes are
/// applied inside a single write-lock section so no increment is lost.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    polls: RwLock<Vec<Poll>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn save(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|user| user.username == username) {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn save(
        &self,
        question: &str,
        options: &[String],
        created_by: &str,
    ) -> Result<Poll, StoreError> {
        let poll = Poll {
            id: Uuid::new_v4(),
            question: question.to_string(),
            options: options.iter().map(PollOption::new).collect(),
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };
        self.polls.write().await.push(poll.clone());
        Ok(poll)
    }

    async fn find_all(&self) -> Result<Vec<Poll>, StoreError> {
        Ok(self.polls.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Poll>, StoreError> {
        let polls = self.polls.read().await;
        Ok(polls.iter().find(|poll| poll.id == id).cloned())
    }

    async fn record_vote(&self, id: Uuid, option_index: i64) -> Result<Poll, StoreError> {
        let mut polls = self.polls.write().await;
        let poll = polls
            .iter_mut()
            .find(|poll| poll.id == id)
            .ok_or(StoreError::PollNotFound(id))?;

        let len = poll.options.len();
        let option = usize::try_from(option_index)
            .ok()
            .and_then(|index| poll.options.get_mut(index))
            .ok_or(StoreError::OptionOutOfRange {
                index: option_index,
                len,
            })?;
        option.votes += 1;

        Ok(poll.clone())
    }
}
