use serde::{Deserialize, Serialize};

use super::repo::{Friend, FriendData};
use crate::{error::AppError, pagination::PageQuery};

/// Friend as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl From<Friend> for FriendDto {
    fn from(f: Friend) -> Self {
        Self {
            id: f.id,
            first_name: f.first_name,
            last_name: f.last_name,
            phone_number: f.phone_number,
        }
    }
}

/// Body of create and update requests. An `id` in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

impl FriendRequest {
    pub fn into_data(self) -> Result<FriendData, AppError> {
        let first_name = required(self.first_name, "firstName")?;
        let last_name = required(self.last_name, "lastName")?;
        let phone_number = required(self.phone_number, "phoneNumber")?;
        Ok(FriendData {
            first_name,
            last_name,
            phone_number,
        })
    }
}

fn required(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// `?searchTerm=&page=&pageSize=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SearchQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
