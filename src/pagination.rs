use serde::{Deserialize, Serialize};

use crate::{config::PagingConfig, error::AppError};

/// `?page=&pageSize=` as sent by the client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Applies defaults; pages below 1 become 1, out-of-range sizes are rejected.
    pub fn resolve(&self, cfg: &PagingConfig) -> Result<PageRequest, AppError> {
        let page_size = self.page_size.unwrap_or(cfg.default_page_size);
        if !(1..=cfg.max_page_size).contains(&page_size) {
            return Err(AppError::validation(format!(
                "pageSize must be between 1 and {}",
                cfg.max_page_size
            )));
        }
        Ok(PageRequest {
            page: self.page.unwrap_or(1).max(1),
            page_size,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

/// Where to read once the total is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: i64,
    pub total_pages: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Clamps the requested page into `[1, max(total_pages, 1)]`.
    /// An empty result reports `total_pages == 0` but still reads page 1.
    pub fn window(&self, total_count: i64) -> PageWindow {
        let total_pages = (total_count + self.page_size - 1) / self.page_size;
        let current_page = self.page.clamp(1, total_pages.max(1));
        PageWindow {
            current_page,
            total_pages,
            offset: (current_page - 1) * self.page_size,
        }
    }
}

/// Response shape shared by every paginated endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "friends")]
    pub items: Vec<T>,
    pub total_count: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}
