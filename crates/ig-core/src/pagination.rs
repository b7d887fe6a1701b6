//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters (from query string)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: i64,

    /// Offset (alternative to page)
    pub offset: Option<i64>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            offset: None,
        }
    }
}

impl PaginationParams {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
            offset: None,
        }
    }

    /// Calculate the SQL offset
    pub fn offset(&self) -> i64 {
        self.offset
            .unwrap_or_else(|| (self.page.max(1) - 1) * self.per_page)
    }

    /// Calculate the SQL limit
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated collection response envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse<T> {
    /// Total count of items matching the query
    pub total: i64,

    /// Number of items in this page
    pub count: i64,

    /// Current page size
    pub page_size: i64,

    /// Current offset
    pub offset: i64,

    /// Items of this page
    pub elements: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn new(elements: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        Self {
            total,
            count: elements.len() as i64,
            page_size: params.per_page,
            offset: params.offset(),
            elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_page() {
        let params = PaginationParams::new(3, 10);
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_explicit_offset_wins() {
        let params = PaginationParams {
            page: 5,
            per_page: 10,
            offset: Some(3),
        };
        assert_eq!(params.offset(), 3);
    }

    #[test]
    fn test_collection_envelope() {
        let params = PaginationParams::new(2, 2);
        let response = CollectionResponse::new(vec!["a", "b"], 5, &params);
        assert_eq!(response.total, 5);
        assert_eq!(response.count, 2);
        assert_eq!(response.offset, 2);
    }
}
