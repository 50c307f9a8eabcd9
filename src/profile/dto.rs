use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo::{Profile, ProfileData};
use crate::error::AppError;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "iso_date")]
    pub birth_date: Date,
    pub photo_url: String,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            birth_date: p.birth_date,
            photo_url: p.photo_url,
        }
    }
}

/// Body of `POST /profile`. Any account id in it is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(with = "iso_date")]
    pub birth_date: Date,
    #[serde(default)]
    pub photo_url: String,
}

impl ProfileRequest {
    pub fn into_data(self) -> Result<ProfileData, AppError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        if first_name.is_empty() {
            return Err(AppError::validation("firstName is required"));
        }
        if last_name.is_empty() {
            return Err(AppError::validation("lastName is required"));
        }
        if self.birth_date > OffsetDateTime::now_utc().date() {
            return Err(AppError::validation("birthDate cannot be in the future"));
        }
        Ok(ProfileData {
            first_name,
            last_name,
            birth_date: self.birth_date,
            photo_url: self.photo_url.trim().to_string(),
        })
    }
}
