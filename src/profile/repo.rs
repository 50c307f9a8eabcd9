use async_trait::async_trait;
use sqlx::FromRow;
use time::Date;

use crate::{db::PgStore, store::StoreError};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Profile {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    pub photo_url: String,
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    pub photo_url: String,
}

impl Profile {
    pub fn from_data(account_id: i64, data: ProfileData) -> Self {
        Self {
            account_id,
            first_name: data.first_name,
            last_name: data.last_name,
            birth_date: data.birth_date,
            photo_url: data.photo_url,
        }
    }
}

/// Profile storage, always addressed by the owning account.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn find(&self, owner: i64) -> Result<Option<Profile>, StoreError>;

    /// Returns `false` when the owner has no profile.
    async fn update(&self, owner: i64, data: &ProfileData) -> Result<bool, StoreError>;
}

#[async_trait]
impl ProfileRepo for PgStore {
    async fn find(&self, owner: i64) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT account_id, first_name, last_name, birth_date, photo_url
            FROM profiles
            WHERE account_id = $1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn update(&self, owner: i64, data: &ProfileData) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE profiles
               SET first_name = $2, last_name = $3, birth_date = $4, photo_url = $5
             WHERE account_id = $1
            "#,
        )
        .bind(owner)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.birth_date)
        .bind(&data.photo_url)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
