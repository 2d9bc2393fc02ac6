//! Inventory item domain module.
//!
//! This crate contains the item record, its field-copy transitions and the
//! query shapes used to derive live views, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod query;

pub use item::{DEFAULT_CATEGORY, Item, NewItem, status};
pub use query::{ItemQuery, resolve_barcode};
