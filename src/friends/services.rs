use tracing::debug;

use super::{
    repo::{Friend, FriendData, FriendRepo},
    search::NameFilter,
};
use crate::{
    auth::claims::Identity,
    error::{AppError, AppResult},
    pagination::{Page, PageRequest},
};

/// A caller's view of the friend store.
///
/// Only constructible from a validated [`Identity`]; every operation is
/// filtered by that identity's account id.
pub struct FriendBook<'a> {
    repo: &'a dyn FriendRepo,
    owner: i64,
}

impl<'a> FriendBook<'a> {
    pub fn for_identity(repo: &'a dyn FriendRepo, identity: &Identity) -> Self {
        Self {
            repo,
            owner: identity.account_id,
        }
    }

    pub async fn list(&self, req: PageRequest) -> AppResult<Page<Friend>> {
        self.search(&NameFilter::Any, req).await
    }

    pub async fn search(&self, filter: &NameFilter, req: PageRequest) -> AppResult<Page<Friend>> {
        let total_count = self.repo.count(self.owner, filter).await?;
        let window = req.window(total_count);
        let items = if total_count == 0 {
            Vec::new()
        } else {
            self.repo
                .page(self.owner, filter, window.offset, req.page_size)
                .await?
        };
        Ok(Page {
            items,
            total_count,
            current_page: window.current_page,
            page_size: req.page_size,
            total_pages: window.total_pages,
        })
    }

    pub async fn get(&self, id: i64) -> AppResult<Friend> {
        self.repo
            .get(self.owner, id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn create(&self, data: &FriendData) -> AppResult<Friend> {
        Ok(self.repo.insert(self.owner, data).await?)
    }

    pub async fn update(&self, id: i64, data: &FriendData) -> AppResult<()> {
        if self.repo.update(self.owner, id, data).await? {
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repo.delete(self.owner, id).await? {
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    fn not_found(&self, id: i64) -> AppError {
        debug!(owner = self.owner, friend_id = id, "friend missing or not owned");
        AppError::NotFound("Friend")
    }
}
