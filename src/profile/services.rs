use tracing::debug;

use super::repo::{Profile, ProfileData, ProfileRepo};
use crate::{
    auth::{claims::Identity, repo::AccountRepo},
    error::{AppError, AppResult},
};

/// Loads the caller's own profile.
pub async fn load_own(profiles: &dyn ProfileRepo, identity: &Identity) -> AppResult<Profile> {
    profiles
        .find(identity.account_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))
}

/// Loads `account_id`'s profile if and only if it is the caller's.
pub async fn load_for(
    profiles: &dyn ProfileRepo,
    identity: &Identity,
    account_id: i64,
) -> AppResult<Profile> {
    if account_id != identity.account_id {
        debug!(
            caller = identity.account_id,
            requested = account_id,
            "profile lookup for another account"
        );
        return Err(AppError::NotFound("Profile"));
    }
    load_own(profiles, identity).await
}

/// Overwrites the caller's profile.
pub async fn save_own(
    accounts: &dyn AccountRepo,
    profiles: &dyn ProfileRepo,
    identity: &Identity,
    data: &ProfileData,
) -> AppResult<()> {
    if accounts.find_by_id(identity.account_id).await?.is_none() {
        return Err(AppError::NotFound("Account"));
    }
    if !profiles.update(identity.account_id, data).await? {
        return Err(AppError::NotFound("Profile"));
    }
    Ok(())
}
