use std::sync::Arc;

use crate::auth::{jwt::JwtKeys, repo::AccountRepo};
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::friends::repo::FriendRepo;
use crate::profile::repo::ProfileRepo;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepo>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub friends: Arc<dyn FriendRepo>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.database_url.as_deref() {
            Some(url) => {
                let store = PgStore::connect(url, config.max_connections).await?;
                store.migrate().await?;
                Ok(Self::with_store(Arc::new(store), config))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Ok(Self::with_store(Arc::new(MemoryStore::new()), config))
            }
        }
    }

    /// Wires one store implementing every repository into the state.
    pub fn with_store<S>(store: Arc<S>, config: Arc<AppConfig>) -> Self
    where
        S: AccountRepo + ProfileRepo + FriendRepo + 'static,
    {
        Self {
            accounts: store.clone(),
            profiles: store.clone(),
            friends: store,
            keys: JwtKeys::new(&config.jwt),
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, PagingConfig};

        let config = Arc::new(AppConfig {
            database_url: None,
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret-test-secret-test-secret!".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            paging: PagingConfig::default(),
        });
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }
}
