use thiserror::Error;

use stockroom_core::{DomainError, ItemId};

use crate::store::StoreError;

/// Errors surfaced by the item directory.
///
/// Reads return these directly. Writes report them through their
/// `WriteHandle`, the failure broadcast and the log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No item with the requested id or barcode (or an update targeted a
    /// missing id).
    #[error("item not found")]
    NotFound,

    /// A required field was blank, or the write was otherwise malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store failed, or the writer task is gone.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DirectoryError {
    pub(crate) fn writer_stopped() -> Self {
        Self::StoreUnavailable("write queue closed".to_string())
    }

    pub(crate) fn handle_spent() -> Self {
        Self::StoreUnavailable("write handle polled after completion".to_string())
    }
}

impl From<StoreError> for DirectoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => DirectoryError::StoreUnavailable(msg),
            StoreError::Corrupt(msg) => DirectoryError::StoreUnavailable(format!("corrupt record: {msg}")),
            StoreError::Duplicate(id) => DirectoryError::InvalidInput(format!("item {id} already exists")),
        }
    }
}

impl From<DomainError> for DirectoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DirectoryError::InvalidInput(msg),
            DomainError::InvalidId(msg) => DirectoryError::InvalidInput(msg),
            DomainError::NotFound => DirectoryError::NotFound,
        }
    }
}

/// A write that did not commit, as published on the failure stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Directory operation name (`create`, `update`, `archive`, ...).
    pub operation: &'static str,
    /// Target of the write. `None` for a `create`, whose id was never stored.
    pub item_id: Option<ItemId>,
    pub error: DirectoryError,
}
