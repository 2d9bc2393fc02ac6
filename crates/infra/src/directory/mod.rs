//! Item directory service.
//!
//! `ItemDirectory` mediates every read and write against an `ItemStore`:
//!
//! ```text
//! caller ── write ──> FIFO queue ──> writer task ──> store
//!                                        │
//!                                        └─> snapshot (watch) ──> LiveItems views
//! caller ── read  ──> store (get by id / barcode)
//! ```
//!
//! Writes return a `WriteHandle` immediately. Failures are reported on the
//! handle, on the `subscribe_failures()` stream, and in the log.

mod error;
mod handle;
mod live;
mod writer;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use stockroom_core::{Clock, ItemId, SystemClock};
use stockroom_inventory::{Item, ItemQuery, NewItem, resolve_barcode};

use crate::store::ItemStore;

pub use error::{DirectoryError, WriteFailure};
pub use handle::WriteHandle;
pub use live::LiveItems;

use writer::{WriteOp, WriteRequest, Writer, report_failure};

const FAILURE_CHANNEL_CAPACITY: usize = 64;

/// Handle to a running item directory. Cheap to clone.
///
/// The writer task stops once every clone has been dropped.
#[derive(Clone)]
pub struct ItemDirectory {
    store: Arc<dyn ItemStore>,
    clock: Arc<dyn Clock>,
    writes: mpsc::UnboundedSender<WriteRequest>,
    snapshot: watch::Receiver<Arc<Vec<Item>>>,
    failures: broadcast::Sender<WriteFailure>,
}

impl core::fmt::Debug for ItemDirectory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemDirectory")
            .field("items", &self.snapshot.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ItemDirectory {
    /// Start a directory over `store` using the wall clock.
    pub async fn start<S>(store: S) -> Result<Self, DirectoryError>
    where
        S: ItemStore + 'static,
    {
        Self::start_with_clock(store, SystemClock).await
    }

    /// Start a directory over `store`, taking timestamps from `clock`.
    ///
    /// Loads the initial snapshot and spawns the writer on the current tokio
    /// runtime.
    pub async fn start_with_clock<S, C>(store: S, clock: C) -> Result<Self, DirectoryError>
    where
        S: ItemStore + 'static,
        C: Clock + 'static,
    {
        let store: Arc<dyn ItemStore> = Arc::new(store);
        let initial = store.load_all().await?;
        tracing::info!(items = initial.len(), "item directory starting");

        let items: BTreeMap<ItemId, Item> = initial.into_iter().map(|i| (i.id, i)).collect();
        let (snapshot_tx, snapshot) = watch::channel(Arc::new(items.values().cloned().collect::<Vec<_>>()));
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        let (writes, rx) = mpsc::unbounded_channel();

        let writer = Writer {
            store: store.clone(),
            items,
            snapshot_tx,
            failures: failures.clone(),
        };
        tokio::spawn(writer.run(rx));

        Ok(Self {
            store,
            clock: Arc::new(clock),
            writes,
            snapshot,
            failures,
        })
    }

    // ── Live views ──────────────────────────────────────────────────────

    pub fn live(&self, query: ItemQuery) -> LiveItems {
        LiveItems::new(query, self.snapshot.clone())
    }

    pub fn list_all(&self) -> LiveItems {
        self.live(ItemQuery::All)
    }

    pub fn list_active(&self) -> LiveItems {
        self.live(ItemQuery::Active)
    }

    pub fn list_archived(&self) -> LiveItems {
        self.live(ItemQuery::Archived)
    }

    /// Active items whose status equals `status`.
    pub fn list_by_status(&self, status: impl Into<String>) -> LiveItems {
        self.live(ItemQuery::by_status(status))
    }

    pub fn list_available(&self) -> LiveItems {
        self.live(ItemQuery::available())
    }

    pub fn list_checked_out(&self) -> LiveItems {
        self.live(ItemQuery::checked_out())
    }

    pub fn list_by_category(&self, category: impl Into<String>, active_only: bool) -> LiveItems {
        self.live(ItemQuery::by_category(category, active_only))
    }

    pub fn list_by_type(&self, item_type: impl Into<String>, active_only: bool) -> LiveItems {
        self.live(ItemQuery::by_type(item_type, active_only))
    }

    /// Full item set as of the last committed write.
    pub fn snapshot(&self) -> Vec<Item> {
        Vec::clone(&self.snapshot.borrow())
    }

    /// Stream of writes that failed to commit.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<WriteFailure> {
        self.failures.subscribe()
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    pub async fn get_by_id(&self, id: ItemId) -> Result<Item, DirectoryError> {
        self.store.get(id).await?.ok_or(DirectoryError::NotFound)
    }

    /// Resolve a barcode to an item.
    ///
    /// Barcodes are not unique; on duplicates the earliest-created item wins.
    pub async fn get_by_barcode(&self, barcode: &str) -> Result<Item, DirectoryError> {
        let matches = self.store.find_by_barcode(barcode).await?;
        if matches.len() > 1 {
            tracing::warn!(barcode, count = matches.len(), "barcode shared by several items");
        }
        resolve_barcode(&matches, barcode)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    // ── Writes ──────────────────────────────────────────────────────────

    /// Queue creation of a new active item. Resolves to the new item's id.
    pub fn create(&self, fields: NewItem) -> WriteHandle<ItemId> {
        let id = ItemId::new();
        match Item::create(id, fields, self.clock.now()) {
            Ok(item) => self.dispatch(WriteOp::Insert(item), id),
            Err(e) => self.reject("create", None, e.into(), id),
        }
    }

    /// Queue a wholesale replacement of the stored record with `item.id`.
    ///
    /// Last write wins; an absent id fails with `NotFound`.
    pub fn update(&self, item: Item) -> WriteHandle<()> {
        self.replace("update", item)
    }

    /// Queue permanent removal. Deleting an absent id succeeds.
    pub fn delete(&self, item: &Item) -> WriteHandle<()> {
        self.delete_by_id(item.id)
    }

    pub fn delete_by_id(&self, id: ItemId) -> WriteHandle<()> {
        self.dispatch(WriteOp::Delete(id), ())
    }

    pub fn archive(&self, item: &Item) -> WriteHandle<()> {
        self.replace("archive", item.archived(self.clock.now()))
    }

    pub fn unarchive(&self, item: &Item) -> WriteHandle<()> {
        self.replace("unarchive", item.unarchived(self.clock.now()))
    }

    /// Change only the status. Does not refresh `last_modified`.
    pub fn set_status(&self, item: &Item, status: impl Into<String>) -> WriteHandle<()> {
        self.replace("set_status", item.with_status(status))
    }

    /// Change only the condition. Does not refresh `last_modified`.
    pub fn set_condition(&self, item: &Item, condition: impl Into<String>) -> WriteHandle<()> {
        self.replace("set_condition", item.with_condition(condition))
    }

    fn replace(&self, operation: &'static str, item: Item) -> WriteHandle<()> {
        if let Err(e) = item.validate() {
            return self.reject(operation, Some(item.id), e.into(), ());
        }
        self.dispatch(WriteOp::Replace { operation, item }, ())
    }

    fn dispatch<T>(&self, op: WriteOp, value: T) -> WriteHandle<T> {
        let (reply, rx) = oneshot::channel();
        match self.writes.send(WriteRequest { op, reply }) {
            Ok(()) => WriteHandle::new(rx, value),
            Err(mpsc::error::SendError(req)) => {
                let operation = req.op.operation();
                let item_id = req.op.item_id();
                self.reject(operation, item_id, DirectoryError::writer_stopped(), value)
            }
        }
    }

    fn reject<T>(
        &self,
        operation: &'static str,
        item_id: Option<ItemId>,
        error: DirectoryError,
        value: T,
    ) -> WriteHandle<T> {
        report_failure(&self.failures, operation, item_id, error.clone());
        WriteHandle::failed(error, value)
    }
}
