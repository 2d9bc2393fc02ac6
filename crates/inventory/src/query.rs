//! Query shapes over the item set.
//!
//! Every live view the directory exposes is a filtered projection of the full
//! item list. `ItemQuery` names the projection; `apply` evaluates it against a
//! snapshot without reordering.

use crate::item::{Item, status};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemQuery {
    /// Every item, active or archived.
    All,
    Active,
    Archived,
    /// Active items with exactly this status.
    ByStatus(String),
    ByCategory { category: String, active_only: bool },
    ByType { item_type: String, active_only: bool },
}

impl ItemQuery {
    pub fn by_status(status: impl Into<String>) -> Self {
        Self::ByStatus(status.into())
    }

    pub fn by_category(category: impl Into<String>, active_only: bool) -> Self {
        Self::ByCategory {
            category: category.into(),
            active_only,
        }
    }

    pub fn by_type(item_type: impl Into<String>, active_only: bool) -> Self {
        Self::ByType {
            item_type: item_type.into(),
            active_only,
        }
    }

    pub fn available() -> Self {
        Self::by_status(status::AVAILABLE)
    }

    pub fn checked_out() -> Self {
        Self::by_status(status::CHECKED_OUT)
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ItemQuery::All => true,
            ItemQuery::Active => item.is_active,
            ItemQuery::Archived => !item.is_active,
            ItemQuery::ByStatus(s) => item.is_active && item.status == *s,
            ItemQuery::ByCategory {
                category,
                active_only,
            } => item.category == *category && (!active_only || item.is_active),
            ItemQuery::ByType {
                item_type,
                active_only,
            } => item.item_type == *item_type && (!active_only || item.is_active),
        }
    }

    pub fn apply(&self, items: &[Item]) -> Vec<Item> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Pick the item a barcode lookup resolves to.
///
/// Barcodes are not unique. When several items carry the same barcode the
/// earliest-created one (smallest id) wins, regardless of `is_active`.
pub fn resolve_barcode<'a>(items: impl IntoIterator<Item = &'a Item>, barcode: &str) -> Option<&'a Item> {
    items
        .into_iter()
        .filter(|i| i.barcode == barcode)
        .min_by_key(|i| i.id)
}
