use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use stockroom_infra::WriteFailure;
use stockroom_inventory::{Item, ItemQuery, NewItem};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items`. Same shape as the domain's `NewItem`.
pub type CreateItemRequest = NewItem;

/// Body of `PUT /items/:id`: the full record minus its id.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub barcode: String,
    pub condition: String,
    pub status: String,
    pub category: String,
    #[serde(default)]
    pub photo_path: Option<String>,
    pub is_active: bool,
    /// Omitted means "keep the stored value".
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl UpdateItemRequest {
    pub fn into_item(self, current: &Item) -> Item {
        Item {
            id: current.id,
            name: self.name,
            item_type: self.item_type,
            barcode: self.barcode,
            condition: self.condition,
            status: self.status,
            category: self.category,
            photo_path: self.photo_path,
            is_active: self.is_active,
            last_modified: self.last_modified.unwrap_or(current.last_modified),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SetConditionRequest {
    pub condition: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveOnlyParams {
    pub active_only: Option<bool>,
}

/// Query string selecting a view for `GET /items` and `GET /stream/items`.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub view: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub active_only: Option<bool>,
}

impl ViewParams {
    pub fn to_query(&self) -> Result<ItemQuery, axum::response::Response> {
        let active_only = self.active_only.unwrap_or(true);
        let missing = |param: &str| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_view",
                format!("view requires the `{param}` parameter"),
            )
        };

        match self.view.as_deref().unwrap_or("all") {
            "all" => Ok(ItemQuery::All),
            "active" => Ok(ItemQuery::Active),
            "archived" => Ok(ItemQuery::Archived),
            "status" => self
                .status
                .clone()
                .map(ItemQuery::ByStatus)
                .ok_or_else(|| missing("status")),
            "category" => self
                .category
                .clone()
                .map(|c| ItemQuery::by_category(c, active_only))
                .ok_or_else(|| missing("category")),
            "type" => self
                .item_type
                .clone()
                .map(|t| ItemQuery::by_type(t, active_only))
                .ok_or_else(|| missing("type")),
            other => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_view",
                format!("unknown view `{other}` (expected all, active, archived, status, category or type)"),
            )),
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn failure_to_json(failure: &WriteFailure) -> serde_json::Value {
    serde_json::json!({
        "operation": failure.operation,
        "item_id": failure.item_id.map(|id| id.to_string()),
        "error": errors::error_code(&failure.error),
        "message": failure.error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(view: Option<&str>) -> ViewParams {
        ViewParams {
            view: view.map(str::to_string),
            ..ViewParams::default()
        }
    }

    #[test]
    fn view_defaults_to_all() {
        assert_eq!(params(None).to_query().ok(), Some(ItemQuery::All));
        assert_eq!(params(Some("archived")).to_query().ok(), Some(ItemQuery::Archived));
    }

    #[test]
    fn filtered_views_need_their_value() {
        assert!(params(Some("status")).to_query().is_err());
        assert!(params(Some("bogus")).to_query().is_err());

        let by_type = ViewParams {
            view: Some("type".to_string()),
            item_type: Some("Tool".to_string()),
            active_only: Some(false),
            ..ViewParams::default()
        };
        assert_eq!(by_type.to_query().ok(), Some(ItemQuery::by_type("Tool", false)));
    }
}
