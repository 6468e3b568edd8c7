use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::repositories::{memory::MemoryTodoStore, todo::{PgTodoStore, TodoStore}};
use crate::services::auth::TokenService;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The todo store.
    pub store: Arc<dyn TodoStore>,
    /// Access token issuance and verification.
    pub tokens: TokenService,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Connects to PostgreSQL and prepares the schema when `database_url` is
    /// set; otherwise falls back to the in-memory store.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn TodoStore> = match &config.database_url {
            Some(url) => {
                let pool = crate::db::create_pool(url)?;
                crate::db::ensure_schema(&pool).await?;
                tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");
                Arc::new(PgTodoStore::new(pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL not set, todos are kept in memory only");
                Arc::new(MemoryTodoStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Builds state around an existing store.
    pub fn with_store(config: &Config, store: Arc<dyn TodoStore>) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            chrono::Duration::minutes(config.token_ttl_minutes),
        );
        tracing::info!("✅ Token service initialized (TTL {} min)", config.token_ttl_minutes);

        AppState {
            store,
            tokens,
            config: config.clone(),
        }
    }
}
