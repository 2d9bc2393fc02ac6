use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

/// Category assigned when a new item does not name one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Well-known status values. Any string is accepted as a status; these are
/// the two the default views are built around.
pub mod status {
    pub const AVAILABLE: &str = "Available";
    pub const CHECKED_OUT: &str = "Checked Out";
}

/// Inventory item record.
///
/// Items are plain values: every mutation produces a modified copy which is
/// then written back to the store wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
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
    pub last_modified: DateTime<Utc>,
}

/// Fields supplied by a caller creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub barcode: String,
    pub condition: String,
    pub status: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        item_type: impl Into<String>,
        barcode: impl Into<String>,
        condition: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            barcode: barcode.into(),
            condition: condition.into(),
            status: status.into(),
            category: None,
            photo_path: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_photo_path(mut self, photo_path: impl Into<String>) -> Self {
        self.photo_path = Some(photo_path.into());
        self
    }
}

impl Item {
    /// Build a fresh, active item from caller-supplied fields.
    pub fn create(id: ItemId, fields: NewItem, at: DateTime<Utc>) -> DomainResult<Self> {
        let item = Self {
            id,
            name: fields.name,
            item_type: fields.item_type,
            barcode: fields.barcode,
            condition: fields.condition,
            status: fields.status,
            category: fields.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            photo_path: fields.photo_path,
            is_active: true,
            last_modified: at,
        };
        item.validate()?;
        Ok(item)
    }

    /// Required text fields must not be blank.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.barcode.trim().is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }
        Ok(())
    }

    /// Copy of this item moved to the archived view.
    pub fn archived(&self, at: DateTime<Utc>) -> Self {
        Self {
            is_active: false,
            last_modified: at,
            ..self.clone()
        }
    }

    /// Copy of this item restored to the active view.
    pub fn unarchived(&self, at: DateTime<Utc>) -> Self {
        Self {
            is_active: true,
            last_modified: at,
            ..self.clone()
        }
    }

    /// Copy with a new status. `last_modified` is left as is.
    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self.clone()
        }
    }

    /// Copy with a new condition. `last_modified` is left as is.
    pub fn with_condition(&self, condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            ..self.clone()
        }
    }
}
