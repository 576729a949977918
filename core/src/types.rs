//! Common payload shapes returned by the API.

use serde::{Deserialize, Serialize};

/// Standard response wrapper: the payload sits under `data`, alongside
/// optional status fields the server may fill in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Paging metadata for list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub current_page: u64,
    pub has_more_pages: bool,
    pub has_pages: bool,
    pub last_page: u64,
    pub per_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode, KeyDecoding};

    #[test]
    fn pagination_decodes_from_snake_case() {
        let body = br#"{
            "total_items": 41, "current_page": 2, "has_more_pages": true,
            "has_pages": true, "last_page": 3, "per_page": 20
        }"#;
        let page: Pagination = decode(body, KeyDecoding::ConvertFromSnakeCase).unwrap();
        assert_eq!(page.total_items, 41);
        assert_eq!(page.per_page, 20);
        assert!(page.has_more_pages);
    }

    #[test]
    fn envelope_status_fields_are_optional() {
        let env: ResponseEnvelope<Vec<u8>> =
            decode(br#"{"data": [1, 2]}"#, KeyDecoding::ConvertFromSnakeCase).unwrap();
        assert_eq!(env.data, vec![1, 2]);
        assert_eq!(env.error, None);
        assert_eq!(env.message, None);
    }
}
