//! Query options and paginated results

use crate::document::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort order (`"createdAt"` ascending, `"-createdAt"` descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }

    /// Parse the `-field` shorthand. Returns None for an empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix('-') {
            Some("") => None,
            Some(field) => Some(Self::desc(field)),
            None if raw.is_empty() => None,
            None => Some(Self::asc(raw)),
        }
    }
}

/// Options passed to the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Page size. `None` means no limit.
    pub limit: Option<usize>,
    /// 1-based page number
    pub page: usize,
    /// Explicit ordering. `None` keeps natural storage order.
    pub sort: Option<Sort>,
    /// Compute total counts
    pub pagination: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { limit: Some(10), page: 1, sort: None, pagination: true }
    }
}

impl QueryOptions {
    /// First match in natural storage order, no counting
    pub fn first() -> Self {
        Self { limit: Some(1), page: 1, sort: None, pagination: false }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { None } else { Some(limit) };
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn without_pagination(mut self) -> Self {
        self.pagination = false;
        self
    }

    /// Number of rows to skip for the requested page
    pub fn offset(&self) -> usize {
        match self.limit {
            Some(limit) => limit.saturating_mul(self.page.max(1) - 1),
            None => 0,
        }
    }
}

/// A page of documents plus pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDocs {
    pub docs: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_docs: Option<usize>,
    pub limit: Option<usize>,
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginatedDocs {
    /// Build the page metadata for a result slice.
    ///
    /// `total` is the number of matching rows before slicing; it is only
    /// exposed when the query asked for pagination.
    pub fn from_page(docs: Vec<Document>, total: usize, options: &QueryOptions) -> Self {
        let page = options.page.max(1);
        let total_pages = match options.limit {
            Some(limit) if limit > 0 => total.div_ceil(limit).max(1),
            _ => 1,
        };
        let has_next_page = options.offset() + docs.len() < total;

        Self {
            docs,
            total_docs: options.pagination.then_some(total),
            limit: options.limit,
            page,
            total_pages: options.pagination.then_some(total_pages),
            has_next_page,
            has_prev_page: page > 1,
        }
    }
}
