//! Success envelopes returned by handlers
//!
//! Every successful response carries `success: true`; list endpoints add
//! the pagination block, mutations add a human-readable message.

use crate::query::page::{Page, PageMeta};
use serde::Serialize;

/// Envelope for a single entity or data object
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Envelope for a paginated list
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.items,
            pagination: page.meta,
        }
    }
}

/// Envelope for mutations with no data payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_response_omits_absent_message() {
        let json = serde_json::to_value(ItemResponse::new(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_item_response_with_message() {
        let json =
            serde_json::to_value(ItemResponse::with_message(1, "Created successfully")).unwrap();
        assert_eq!(json["message"], "Created successfully");
    }

    #[test]
    fn test_list_response_from_page() {
        let page = Page {
            items: vec![1, 2, 3],
            meta: PageMeta::new(1, 10, 3),
        };
        let json = serde_json::to_value(ListResponse::from(page)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
        assert_eq!(json["pagination"]["total_items"], 3);
        assert_eq!(json["pagination"]["per_page"], 10);
        assert_eq!(json["pagination"]["has_next"], false);
    }
}
