//! Client-side pagination of list results.
//!
//! The backend returns whole collections; views page through them locally.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Page sizes a caller may pick.
pub const PER_PAGE_VALUES: [u32; 4] = [5, 10, 20, 50];

/// Pagination parameters. Pages are 1-indexed.
///
/// The default is `page = 1, per_page = 20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Parse raw query values.
    ///
    /// Anything unparsable, a page below 1, or a page size outside
    /// [`PER_PAGE_VALUES`] falls back to the default.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        let defaults = Self::default();
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(defaults.page);
        let per_page = per_page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| PER_PAGE_VALUES.contains(p))
            .unwrap_or(defaults.per_page);
        Self { page, per_page }
    }

    fn offset(self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: usize,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Slice the requested page out of a full list. Pages past the end are empty.
    pub fn from_items(all: Vec<T>, params: PaginationParams) -> Self {
        let total_count = all.len();
        let offset = params.offset();
        let items: Vec<T> = all
            .into_iter()
            .skip(offset)
            .take(params.per_page as usize)
            .collect();
        let has_more = offset.saturating_add(items.len()) < total_count;
        Self {
            items,
            page: params.page,
            per_page: params.per_page,
            total_count,
            has_more,
        }
    }
}
