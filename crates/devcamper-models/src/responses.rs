//! Success envelopes shared by every resource.

use devcamper_core::query::PaginationLinks;
use serde::Serialize;
use utoipa::ToSchema;

/// `{ success: true, data }`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ success: true, count, pagination, data }`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub pagination: PaginationLinks,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationLinks) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination,
            data,
        }
    }
}

/// Body of a delete response: `data` is an empty object.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_envelope() {
        let json = serde_json::to_value(DataResponse::new(Empty {})).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": {} }));
    }

    #[test]
    fn test_list_counts_returned_items() {
        let json = serde_json::to_value(ListResponse::new(
            vec![1, 2, 3],
            PaginationLinks::new(1, 3, 10),
        ))
        .unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["pagination"]["next"]["page"], 2);
        assert!(json["pagination"].get("prev").is_none());
    }
}
