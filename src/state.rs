// src/state.rs
use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::Authenticator,
    config::Config,
    db,
    store::{CredentialStore, MemoryStore, PgStore, PollStore},
};

/// Shared handler state. Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub polls: Arc<dyn PollStore>,
    pub auth: Authenticator,
}

impl AppState {
    /// Use one backend for both collections.
    pub fn new<S>(store: Arc<S>, auth: Authenticator) -> Self
    where
        S: CredentialStore + PollStore + 'static,
    {
        Self {
            users: store.clone(),
            polls: store,
            auth,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, sqlx::Error> {
        let auth = Authenticator::new(&config.signing_key, config.token_ttl);

        match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.max_connections).await?;
                db::ensure_schema(&pool).await?;
                info!("Connected to PostgreSQL");
                Ok(Self::new(Arc::new(PgStore::new(pool)), auth))
            }
            None => {
                warn!("DATABASE_URL not set, polls and users will only live in memory");
                Ok(Self::new(Arc::new(MemoryStore::new()), auth))
            }
        }
    }
}
