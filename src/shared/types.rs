use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Envelope wrapped around every JSON response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

pub fn default_page() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Turns a 1-indexed page request into an OFFSET/LIMIT window.
///
/// Implemented by every query struct carrying `page` and `pageSize`.
pub trait Paginate {
    fn page(&self) -> i64;
    fn page_size(&self) -> i64;

    /// Rows per page, clamped to `1..=MAX_PAGE_SIZE`
    fn limit(&self) -> i64 {
        self.page_size().clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip. Saturates instead of overflowing on absurd page numbers.
    fn offset(&self) -> i64 {
        self.page()
            .max(1)
            .saturating_sub(1)
            .saturating_mul(self.limit())
    }
}

/// `page`/`pageSize` query parameters for plain list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Rows per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Paginate for PaginationQuery {
    fn page(&self) -> i64 {
        self.page
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}
