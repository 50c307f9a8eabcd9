use async_trait::async_trait;
use sqlx::FromRow;

use super::search::NameFilter;
use crate::{db::PgStore, store::StoreError};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Friend {
    pub id: i64,
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendData {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Friend storage. Every method is bounded by the owning account id;
/// rows of other owners are never read or written.
#[async_trait]
pub trait FriendRepo: Send + Sync {
    async fn count(&self, owner: i64, filter: &NameFilter) -> Result<i64, StoreError>;

    /// Matching rows in ascending id order.
    async fn page(
        &self,
        owner: i64,
        filter: &NameFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Friend>, StoreError>;

    async fn get(&self, owner: i64, id: i64) -> Result<Option<Friend>, StoreError>;

    async fn insert(&self, owner: i64, data: &FriendData) -> Result<Friend, StoreError>;

    /// Returns `false` when no row with this id belongs to `owner`.
    async fn update(&self, owner: i64, id: i64, data: &FriendData) -> Result<bool, StoreError>;

    /// Returns `false` when no row with this id belongs to `owner`.
    async fn delete(&self, owner: i64, id: i64) -> Result<bool, StoreError>;
}

// $2 = either-name fragment, $3 = first-name fragment, $4 = last-name fragment
const NAME_FILTER: &str = r#"
    account_id = $1
    AND ($2::text IS NULL
         OR strpos(lower(first_name), $2) > 0
         OR strpos(lower(last_name), $2) > 0)
    AND ($3::text IS NULL OR strpos(lower(first_name), $3) > 0)
    AND ($4::text IS NULL OR strpos(lower(last_name), $4) > 0)
"#;

#[async_trait]
impl FriendRepo for PgStore {
    async fn count(&self, owner: i64, filter: &NameFilter) -> Result<i64, StoreError> {
        let (either, first, last) = filter.sql_params();
        let sql = format!("SELECT COUNT(*) FROM friends WHERE {NAME_FILTER}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(owner)
            .bind(either)
            .bind(first)
            .bind(last)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn page(
        &self,
        owner: i64,
        filter: &NameFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Friend>, StoreError> {
        let (either, first, last) = filter.sql_params();
        let sql = format!(
            "SELECT id, account_id, first_name, last_name, phone_number
             FROM friends
             WHERE {NAME_FILTER}
             ORDER BY id ASC
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, Friend>(&sql)
            .bind(owner)
            .bind(either)
            .bind(first)
            .bind(last)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, owner: i64, id: i64) -> Result<Option<Friend>, StoreError> {
        let row = sqlx::query_as::<_, Friend>(
            r#"
            SELECT id, account_id, first_name, last_name, phone_number
            FROM friends
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, owner: i64, data: &FriendData) -> Result<Friend, StoreError> {
        let row = sqlx::query_as::<_, Friend>(
            r#"
            INSERT INTO friends (account_id, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, first_name, last_name, phone_number
            "#,
        )
        .bind(owner)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, owner: i64, id: i64, data: &FriendData) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE friends
               SET first_name = $3, last_name = $4, phone_number = $5
             WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, owner: i64, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM friends WHERE id = $1 AND account_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
