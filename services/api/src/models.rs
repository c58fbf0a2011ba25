//! API models for request and response payloads

use serde::Deserialize;

pub mod post;
pub mod social;
pub mod user;

/// Largest page a listing endpoint will return
pub const MAX_PAGE_SIZE: i64 = 20;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Page numbers start at 1; sizes are clamped to `1..=MAX_PAGE_SIZE`
    ///
    /// Offsets saturate at `i64::MAX`, so a page past the end of any listing
    /// comes back empty.
    pub fn new(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page_number = page_number.unwrap_or(1).max(1);
        let limit = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        Self {
            limit,
            offset: (page_number - 1).saturating_mul(limit),
        }
    }
}

/// Query parameters for user search
#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchQuery {
    /// Username prefix
    pub input: String,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for listings keyed by a parent id
///
/// `user_id`, `post_id` and `comment_id` are accepted as aliases of `id` so
/// each endpoint keeps its natural parameter name.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(alias = "user_id", alias = "post_id", alias = "comment_id")]
    pub id: uuid::Uuid,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl UserSearchQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page_number, self.page_size)
    }
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page_number, self.page_size)
    }
}
