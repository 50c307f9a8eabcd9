use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::{Account, AccountRepo},
};
use crate::{
    error::{AppError, AppResult},
    profile::repo::ProfileData,
    store::StoreError,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Placeholder profile every new account starts with.
pub fn default_profile() -> ProfileData {
    ProfileData {
        first_name: "Default".into(),
        last_name: "User".into(),
        birth_date: OffsetDateTime::now_utc().date(),
        photo_url: String::new(),
    }
}

/// Creates an account with a placeholder profile.
///
/// Email uniqueness is decided by the store in the same write as the insert.
pub async fn register(accounts: &dyn AccountRepo, email: &str, password: &str) -> AppResult<Account> {
    let email = email.trim();
    if !is_valid_email(email) {
        warn!(email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let hash = hash_password(password)?;
    let account = match accounts
        .create_with_profile(email, &hash, &default_profile())
        .await
    {
        Ok(a) => a,
        Err(StoreError::Conflict) => {
            warn!(email, "email already registered");
            return Err(AppError::DuplicateAccount);
        }
        Err(e) => return Err(e.into()),
    };

    info!(account_id = account.id, email = %account.email, "account registered");
    Ok(account)
}

/// Checks credentials and issues a bearer token.
pub async fn login(
    accounts: &dyn AccountRepo,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(AppError::validation("Invalid email"));
    }

    let Some(account) = accounts.find_by_email(email).await? else {
        warn!("login failed");
        return Err(AppError::InvalidCredentials);
    };

    match verify_password(password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!(account_id = account.id, "login failed");
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => {
            error!(account_id = account.id, error = %e, "stored credential unreadable");
            return Err(AppError::Internal(e.into()));
        }
    }

    let token = keys.issue(account.id, &account.email)?;
    info!(account_id = account.id, "account logged in");
    Ok(token)
}
