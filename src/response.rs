//! Success response envelope shared by every endpoint.
//!
//! Successful calls answer `{"success": true, "message": ..., "data": ...}`
//! with an optional `"meta"` block carrying pagination counters; failures are
//! rendered by [`crate::error::AppError`] as `{"success": false, "message"}`.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    /// Present on every success, `null` when an operation has no payload
    /// (e.g. delete).
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Pagination counters reported alongside a task listing.
///
/// `total` counts all rows matching the filters, ignoring the page window;
/// `total_pages` is `ceil(total / limit)` and 0 when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T: Serialize> ApiResponse<T> {
    fn envelope(message: &str, data: Option<T>, meta: Option<PageMeta>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            meta,
        }
    }

    /// 200 OK with a payload.
    pub fn ok(message: &str, data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::envelope(message, Some(data), None))
    }

    /// 200 OK with a payload and pagination metadata.
    pub fn ok_with_meta(message: &str, data: T, meta: PageMeta) -> HttpResponse {
        HttpResponse::Ok().json(Self::envelope(message, Some(data), Some(meta)))
    }

    /// 201 Created with a payload.
    pub fn created(message: &str, data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::envelope(message, Some(data), None))
    }
}

impl ApiResponse<()> {
    /// 200 OK with `"data": null`.
    pub fn ok_empty(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse::<()>::envelope(message, None, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::envelope(
            "Task retrieved successfully",
            Some(serde_json::json!({"id": 1})),
            None,
        ))
        .unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Task retrieved successfully");
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn test_empty_data_serializes_as_null() {
        let body =
            serde_json::to_value(ApiResponse::<()>::envelope("Task deleted successfully", None, None))
                .unwrap();

        assert!(body["data"].is_null());
        assert!(body.as_object().unwrap().contains_key("data"));
    }

    #[test]
    fn test_meta_field_names_are_camel_case() {
        let meta = PageMeta {
            page: 2,
            limit: 10,
            total: 15,
            total_pages: 2,
        };
        let body = serde_json::to_value(ApiResponse::envelope(
            "Tasks retrieved successfully",
            Some(Vec::<i32>::new()),
            Some(meta),
        ))
        .unwrap();

        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["meta"]["limit"], 10);
        assert_eq!(body["meta"]["total"], 15);
        assert_eq!(body["meta"]["totalPages"], 2);
    }
}
