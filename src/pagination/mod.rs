//! Wire envelope for multi-page list responses.
//!
//! The page-following loop itself lives on
//! [`ControlPlaneClient::paginate`](crate::client::ControlPlaneClient::paginate);
//! this module only models the envelope a list endpoint returns.

use serde::Deserialize;

/// Link wrapper inside the pagination block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Absolute or relative URL of the linked page.
    #[serde(default)]
    pub href: String,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// Reference to the next page; absent or empty on the last page.
    #[serde(default)]
    pub next: Option<Link>,
    /// Total number of results across all pages, when the server reports
    /// it.
    #[serde(default)]
    pub total_results: Option<u64>,
}

/// One page of a list endpoint: a homogeneous sequence of items plus the
/// pointer to the next page, if any.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PaginatedList<T> {
    /// Pagination block.
    #[serde(default)]
    pub pagination: Pagination,
    /// Items of this page, in server order.
    #[serde(default)]
    pub resources: Vec<T>,
}

impl<T> PaginatedList<T> {
    /// The next-page reference, if present and non-empty.
    pub fn next_href(&self) -> Option<&str> {
        self.pagination
            .next
            .as_ref()
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureFlag;

    #[test]
    fn test_deserialize_page_with_next() {
        let page: PaginatedList<FeatureFlag> = serde_json::from_str(
            r#"{
                "pagination": {
                    "total_results": 3,
                    "next": {"href": "https://api.example.com/v3/feature_flags?page=2"}
                },
                "resources": [
                    {"name": "a", "enabled": true},
                    {"name": "b", "enabled": false}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.resources.len(), 2);
        assert_eq!(
            page.next_href(),
            Some("https://api.example.com/v3/feature_flags?page=2")
        );
        assert_eq!(page.pagination.total_results, Some(3));
    }

    #[test]
    fn test_null_next_is_last_page() {
        let page: PaginatedList<FeatureFlag> = serde_json::from_str(
            r#"{"pagination": {"next": null}, "resources": [{"name": "a", "enabled": true}]}"#,
        )
        .unwrap();

        assert!(page.next_href().is_none());
    }

    #[test]
    fn test_empty_href_is_last_page() {
        let page: PaginatedList<FeatureFlag> = serde_json::from_str(
            r#"{"pagination": {"next": {"href": ""}}, "resources": []}"#,
        )
        .unwrap();

        assert!(page.next_href().is_none());
        assert!(page.resources.is_empty());
    }

    #[test]
    fn test_missing_blocks_default() {
        let page: PaginatedList<FeatureFlag> = serde_json::from_str("{}").unwrap();

        assert!(page.next_href().is_none());
        assert!(page.resources.is_empty());
    }
}
