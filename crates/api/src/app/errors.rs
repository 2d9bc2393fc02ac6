use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::ItemId;
use stockroom_infra::DirectoryError;

pub fn error_code(err: &DirectoryError) -> &'static str {
    match err {
        DirectoryError::NotFound => "not_found",
        DirectoryError::InvalidInput(_) => "invalid_input",
        DirectoryError::StoreUnavailable(_) => "store_unavailable",
    }
}

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    let status = match &err {
        DirectoryError::NotFound => StatusCode::NOT_FOUND,
        DirectoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DirectoryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    json_error(status, error_code(&err), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_item_id(raw: &str) -> Result<ItemId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"))
}
