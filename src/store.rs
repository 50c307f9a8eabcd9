use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::repo::{Account, AccountRepo},
    friends::{
        repo::{Friend, FriendData, FriendRepo},
        search::NameFilter,
    },
    profile::repo::{Profile, ProfileData, ProfileRepo},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Process-local store with the same semantics as the Postgres one.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    profiles: HashMap<i64, Profile>,
    friends: BTreeMap<i64, Friend>,
    last_account_id: i64,
    last_friend_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn owned_matching<'a>(
        &'a self,
        owner: i64,
        filter: &'a NameFilter,
    ) -> impl Iterator<Item = &'a Friend> + 'a {
        self.friends
            .values()
            .filter(move |f| f.account_id == owner && filter.matches(&f.first_name, &f.last_name))
    }
}

#[async_trait]
impl AccountRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn create_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        profile: &ProfileData,
    ) -> Result<Account, StoreError> {
        // single write guard: the uniqueness check and insert cannot interleave
        let mut t = self.tables.write().await;
        if t.accounts.values().any(|a| a.email == email) {
            return Err(StoreError::Conflict);
        }
        t.last_account_id += 1;
        let account = Account {
            id: t.last_account_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.accounts.insert(account.id, account.clone());
        t.profiles
            .insert(account.id, Profile::from_data(account.id, profile.clone()));
        Ok(account)
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn find(&self, owner: i64) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&owner).cloned())
    }

    async fn update(&self, owner: i64, data: &ProfileData) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        match t.profiles.get_mut(&owner) {
            Some(p) => {
                *p = Profile::from_data(owner, data.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FriendRepo for MemoryStore {
    async fn count(&self, owner: i64, filter: &NameFilter) -> Result<i64, StoreError> {
        let t = self.tables.read().await;
        Ok(t.owned_matching(owner, filter).count() as i64)
    }

    async fn page(
        &self,
        owner: i64,
        filter: &NameFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Friend>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.owned_matching(owner, filter)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, owner: i64, id: i64) -> Result<Option<Friend>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.friends.get(&id).filter(|f| f.account_id == owner).cloned())
    }

    async fn insert(&self, owner: i64, data: &FriendData) -> Result<Friend, StoreError> {
        let mut t = self.tables.write().await;
        t.last_friend_id += 1;
        let friend = Friend {
            id: t.last_friend_id,
            account_id: owner,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            phone_number: data.phone_number.clone(),
        };
        t.friends.insert(friend.id, friend.clone());
        Ok(friend)
    }

    async fn update(&self, owner: i64, id: i64, data: &FriendData) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        match t.friends.get_mut(&id).filter(|f| f.account_id == owner) {
            Some(f) => {
                f.first_name = data.first_name.clone();
                f.last_name = data.last_name.clone();
                f.phone_number = data.phone_number.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, owner: i64, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let owned = t.friends.get(&id).is_some_and(|f| f.account_id == owner);
        if owned {
            t.friends.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn profile() -> ProfileData {
        ProfileData {
            first_name: "Default".into(),
            last_name: "User".into(),
            birth_date: date!(2000 - 01 - 01),
            photo_url: String::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store
            .create_with_profile("a@b.co", "hash", &profile())
            .await
            .expect("first insert");
        let err = store
            .create_with_profile("a@b.co", "hash", &profile())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_with_profile("a@b.co", "h", &profile()).await.unwrap();
        store.create_with_profile("A@b.co", "h", &profile()).await.unwrap();
    }

    #[tokio::test]
    async fn account_gets_profile_and_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create_with_profile("a@b.co", "h", &profile()).await.unwrap();
        let b = store.create_with_profile("c@d.co", "h", &profile()).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        let p = ProfileRepo::find(&store, b.id).await.unwrap().expect("profile");
        assert_eq!(p.first_name, "Default");
    }

    #[tokio::test]
    async fn friend_mutations_respect_owner() {
        let store = MemoryStore::new();
        let data = FriendData {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            phone_number: "555".into(),
        };
        let f = store.insert(1, &data).await.unwrap();
        assert!(store.get(2, f.id).await.unwrap().is_none());
        assert!(!FriendRepo::update(&store, 2, f.id, &data).await.unwrap());
        assert!(!store.delete(2, f.id).await.unwrap());
        assert!(store.delete(1, f.id).await.unwrap());
        assert!(store.get(1, f.id).await.unwrap().is_none());
    }
}
