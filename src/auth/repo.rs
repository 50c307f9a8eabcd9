use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    db::{map_unique, PgStore},
    profile::repo::ProfileData,
    store::StoreError,
};

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password_hash: String, // salted credential, never exposed
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Inserts the account and its profile together.
    /// Returns [`StoreError::Conflict`] when the email is already taken.
    async fn create_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        profile: &ProfileData,
    ) -> Result<Account, StoreError>;
}

#[async_trait]
impl AccountRepo for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn create_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        profile: &ProfileData,
    ) -> Result<Account, StoreError> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (account_id, first_name, last_name, birth_date, photo_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.birth_date)
        .bind(&profile.photo_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(account)
    }
}
