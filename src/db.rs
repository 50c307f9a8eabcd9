use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::store::StoreError;

/// Postgres-backed resource store.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run database migrations")?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

/// Maps a unique-constraint violation to [`StoreError::Conflict`].
pub(crate) fn map_unique(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Database(e),
    }
}
