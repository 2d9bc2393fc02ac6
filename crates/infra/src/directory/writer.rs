//! The write queue and its single consumer.
//!
//! Writes are applied strictly in the order they were queued. The writer
//! owns the authoritative snapshot and republishes it after each committed
//! write.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use stockroom_core::ItemId;
use stockroom_inventory::Item;

use super::error::{DirectoryError, WriteFailure};
use crate::store::ItemStore;

#[derive(Debug)]
pub(crate) enum WriteOp {
    Insert(Item),
    Replace { operation: &'static str, item: Item },
    Delete(ItemId),
}

impl WriteOp {
    pub(crate) fn operation(&self) -> &'static str {
        match self {
            WriteOp::Insert(_) => "create",
            WriteOp::Replace { operation, .. } => *operation,
            WriteOp::Delete(_) => "delete",
        }
    }

    /// The existing item this write targets. `None` for inserts.
    pub(crate) fn item_id(&self) -> Option<ItemId> {
        match self {
            WriteOp::Insert(_) => None,
            WriteOp::Replace { item, .. } => Some(item.id),
            WriteOp::Delete(id) => Some(*id),
        }
    }
}

#[derive(Debug)]
pub(crate) struct WriteRequest {
    pub op: WriteOp,
    pub reply: oneshot::Sender<Result<(), DirectoryError>>,
}

/// Log a failed write and publish it on the failure stream.
pub(crate) fn report_failure(
    failures: &broadcast::Sender<WriteFailure>,
    operation: &'static str,
    item_id: Option<ItemId>,
    error: DirectoryError,
) {
    match &error {
        DirectoryError::StoreUnavailable(_) => {
            tracing::error!(operation, item_id = ?item_id, error = %error, "item write failed");
        }
        _ => {
            tracing::warn!(operation, item_id = ?item_id, error = %error, "item write rejected");
        }
    }
    // No subscribers is fine; the log line above is the fallback.
    let _ = failures.send(WriteFailure {
        operation,
        item_id,
        error,
    });
}

pub(crate) struct Writer {
    pub store: Arc<dyn ItemStore>,
    pub items: BTreeMap<ItemId, Item>,
    pub snapshot_tx: watch::Sender<Arc<Vec<Item>>>,
    pub failures: broadcast::Sender<WriteFailure>,
}

impl Writer {
    /// Drain the queue until every sender is dropped.
    pub(crate) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
        while let Some(WriteRequest { op, reply }) = rx.recv().await {
            let operation = op.operation();
            let item_id = op.item_id();

            let result = match self.apply(op).await {
                Ok(true) => {
                    self.publish();
                    tracing::debug!(operation, item_id = ?item_id, "item write committed");
                    Ok(())
                }
                Ok(false) => {
                    tracing::debug!(operation, item_id = ?item_id, "item write was a no-op");
                    Ok(())
                }
                Err(e) => {
                    report_failure(&self.failures, operation, item_id, e.clone());
                    Err(e)
                }
            };

            // The caller may have dropped its handle; the write stands either way.
            let _ = reply.send(result);
        }

        tracing::debug!("item write queue closed; writer stopping");
    }

    /// Apply one write to the store, then to the local snapshot.
    ///
    /// Returns whether the snapshot changed.
    async fn apply(&mut self, op: WriteOp) -> Result<bool, DirectoryError> {
        match op {
            WriteOp::Insert(item) => {
                self.store.insert(item.clone()).await?;
                self.items.insert(item.id, item);
                Ok(true)
            }
            WriteOp::Replace { item, .. } => {
                if !self.store.update(item.clone()).await? {
                    return Err(DirectoryError::NotFound);
                }
                self.items.insert(item.id, item);
                Ok(true)
            }
            WriteOp::Delete(id) => {
                let existed = self.store.delete(id).await?;
                let held = self.items.remove(&id).is_some();
                Ok(existed || held)
            }
        }
    }

    fn publish(&self) {
        let snapshot: Vec<Item> = self.items.values().cloned().collect();
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}
