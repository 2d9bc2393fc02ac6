use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use stockroom_infra::ItemDirectory;
use stockroom_inventory::Item;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/archive", post(archive_item))
        .route("/:id/unarchive", post(unarchive_item))
        .route("/:id/status", put(set_status))
        .route("/:id/condition", put(set_condition))
}

fn items_response(items: Vec<Item>) -> axum::response::Response {
    (StatusCode::OK, Json(items)).into_response()
}

/// Load the current record for a path id, or produce the error response.
async fn load_item(directory: &ItemDirectory, raw_id: &str) -> Result<Item, axum::response::Response> {
    let id = errors::parse_item_id(raw_id)?;
    directory
        .get_by_id(id)
        .await
        .map_err(errors::directory_error_to_response)
}

// -------------------------
// Reads
// -------------------------

pub async fn list_items(
    Extension(directory): Extension<ItemDirectory>,
    Query(params): Query<dto::ViewParams>,
) -> axum::response::Response {
    match params.to_query() {
        Ok(query) => items_response(directory.live(query).current()),
        Err(resp) => resp,
    }
}

pub async fn list_by_status(
    Extension(directory): Extension<ItemDirectory>,
    Path(status): Path<String>,
) -> axum::response::Response {
    items_response(directory.list_by_status(status).current())
}

pub async fn list_by_category(
    Extension(directory): Extension<ItemDirectory>,
    Path(category): Path<String>,
    Query(params): Query<dto::ActiveOnlyParams>,
) -> axum::response::Response {
    let active_only = params.active_only.unwrap_or(true);
    items_response(directory.list_by_category(category, active_only).current())
}

pub async fn list_by_type(
    Extension(directory): Extension<ItemDirectory>,
    Path(item_type): Path<String>,
    Query(params): Query<dto::ActiveOnlyParams>,
) -> axum::response::Response {
    let active_only = params.active_only.unwrap_or(true);
    items_response(directory.list_by_type(item_type, active_only).current())
}

pub async fn get_item(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_item(&directory, &id).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn get_by_barcode(
    Extension(directory): Extension<ItemDirectory>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    match directory.get_by_barcode(&barcode).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

// -------------------------
// Writes
// -------------------------

pub async fn create_item(
    Extension(directory): Extension<ItemDirectory>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    match directory.create(body).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let current = match load_item(&directory, &id).await {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match directory.update(body.into_item(&current)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

/// Deleting an unknown (but well-formed) id is not an error.
pub async fn delete_item(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_item_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match directory.delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn archive_item(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item = match load_item(&directory, &id).await {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match directory.archive(&item).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn unarchive_item(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item = match load_item(&directory, &id).await {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match directory.unarchive(&item).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn set_status(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStatusRequest>,
) -> axum::response::Response {
    let item = match load_item(&directory, &id).await {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match directory.set_status(&item, body.status).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn set_condition(
    Extension(directory): Extension<ItemDirectory>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetConditionRequest>,
) -> axum::response::Response {
    let item = match load_item(&directory, &id).await {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    match directory.set_condition(&item, body.condition).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}
