//! List Filter State
//!
//! Search text, status filter, page and page size driving the list view.
//! Search input is debounced by the caller before reaching [`FilterState::set_search`];
//! everything here applies immediately.

use std::fmt;

use crate::api::ListQuery;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::ItemStatus;

/// Status dropdown value; `All` sends no status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ItemStatus),
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(ItemStatus::Active),
        StatusFilter::Only(ItemStatus::Inactive),
        StatusFilter::Only(ItemStatus::Archived),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All statuses",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            other => ItemStatus::parse(other).map(StatusFilter::Only),
        }
    }

    pub fn status(&self) -> Option<ItemStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective filter state; every change returns whether a refetch is due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub page: u32,
    pub limit: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    /// Surrounding whitespace is not significant
    pub fn set_search(&mut self, search: &str) -> bool {
        let search = search.trim();
        if self.search == search {
            return false;
        }
        self.search = search.to_string();
        self.page = 1;
        true
    }

    pub fn set_status(&mut self, status: StatusFilter) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.page = 1;
        true
    }

    pub fn set_limit(&mut self, limit: u32) -> bool {
        let limit = limit.max(1);
        if self.limit == limit {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        true
    }

    /// Page numbers are 1-based; zero is clamped to the first page
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn to_query(&self) -> ListQuery {
        let search = self.search.trim();
        ListQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            status: self.status.status(),
            page: self.page,
            limit: self.limit,
        }
    }
}
