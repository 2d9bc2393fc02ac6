use axum::{routing::get, Router};

pub mod items;
pub mod system;

/// Router for all directory endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .route("/barcodes/:barcode", get(items::get_by_barcode))
        .route("/views/status/:status", get(items::list_by_status))
        .route("/views/category/:category", get(items::list_by_category))
        .route("/views/type/:item_type", get(items::list_by_type))
        .route("/stream/items", get(system::stream_items))
        .route("/stream/failures", get(system::stream_failures))
}
