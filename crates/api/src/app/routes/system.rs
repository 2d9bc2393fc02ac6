//! Health and server-sent-event endpoints.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use stockroom_infra::ItemDirectory;

use crate::app::dto;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /stream/items?view=...
///
/// Live view over SSE. The first `items` event carries the current view;
/// one follows after every committed write.
pub async fn stream_items(
    Extension(directory): Extension<ItemDirectory>,
    Query(params): Query<dto::ViewParams>,
) -> axum::response::Response {
    let query = match params.to_query() {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let events = directory
        .live(query)
        .into_stream()
        .map(|items| SseEvent::default().event("items").json_data(items));

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

/// GET /stream/failures
///
/// Writes that failed to commit, as they happen. Lagged receivers skip the
/// missed failures (they are still in the log).
pub async fn stream_failures(Extension(directory): Extension<ItemDirectory>) -> axum::response::Response {
    let events = BroadcastStream::new(directory.subscribe_failures()).filter_map(|msg| match msg {
        Ok(failure) => Some(Ok::<_, Infallible>(
            SseEvent::default()
                .event("failure")
                .data(dto::failure_to_json(&failure).to_string()),
        )),
        Err(lagged) => {
            tracing::warn!(error = %lagged, "failure stream subscriber lagged");
            None
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}
