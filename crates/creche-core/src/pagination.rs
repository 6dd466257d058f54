//! Pagination for list endpoints.
//!
//! Lists accept `limit` plus either `offset` or `page`. `limit` is clamped to
//! `1..=100` (default 10); when `page` is present it wins over `offset`.
//! Responses wrap rows as `{ "data": [...], "meta": PaginationMeta }`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde::deserialize_optional_number;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Metadata describing the slice returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of rows matching the filters
    pub total: i64,
    /// Effective page size
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Present only when the request used page-based pagination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether rows remain after this slice
    pub has_more: bool,
}

/// Query parameters shared by every list endpoint.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Page size (1-100, default 10)
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<i64>,
    /// Rows to skip, ignored when `page` is set
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub offset: Option<i64>,
    /// 1-indexed page number
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
            page: None,
        }
    }
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    /// Builds response metadata for a query that matched `total` rows.
    #[must_use]
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();

        PaginationMeta {
            total,
            limit,
            offset: Some(offset),
            page: self.page(),
            has_more: offset + limit < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_given() {
        let p = params(None, None, None);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn limit_is_clamped() {
        for (input, expected) in [(Some(0), 1), (Some(-5), 1), (Some(55), 55), (Some(500), 100)] {
            assert_eq!(params(input, None, None).limit(), expected);
        }
    }

    #[test]
    fn negative_offset_is_zero() {
        assert_eq!(params(Some(10), Some(-3), None).offset(), 0);
    }

    #[test]
    fn page_overrides_offset() {
        let p = params(Some(20), Some(7), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn page_below_one_is_first_page() {
        let p = params(Some(10), None, Some(0));
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), Some(1));
    }

    #[test]
    fn meta_reports_remaining_rows() {
        let p = params(Some(10), Some(20), None);
        let meta = p.meta(31);
        assert_eq!(meta.offset, Some(20));
        assert!(meta.has_more);

        let meta = p.meta(30);
        assert!(!meta.has_more);
    }

    #[test]
    fn meta_serialization_skips_missing_page() {
        let meta = params(Some(5), None, None).meta(2);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["total"], 2);
        assert!(json.get("page").is_none());
        assert_eq!(json["has_more"], false);
    }

    #[test]
    fn query_strings_with_empty_values_are_ignored() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"","page":"2"}"#).unwrap();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 10);
    }
}
