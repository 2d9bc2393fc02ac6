//! Postgres-backed item store.
//!
//! Items live in a single `items` table keyed by the item UUID. Listing
//! queries order by `id`, which for UUIDv7 ids is creation order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use stockroom_core::ItemId;
use stockroom_inventory::Item;

use super::{ItemStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id             UUID PRIMARY KEY,
    name           TEXT NOT NULL,
    item_type      TEXT NOT NULL,
    barcode        TEXT NOT NULL,
    condition      TEXT NOT NULL,
    status         TEXT NOT NULL,
    category       TEXT NOT NULL DEFAULT 'Other',
    photo_path     TEXT NULL,
    is_active      BOOLEAN NOT NULL DEFAULT TRUE,
    last_modified  TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS items_barcode_idx ON items (barcode);
"#;

const SELECT_COLUMNS: &str =
    "id, name, item_type, barcode, condition, status, category, photo_path, is_active, last_modified";

/// Item store backed by a Postgres connection pool.
///
/// The pool is thread-safe; the store adds no locking of its own.
#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: Arc<PgPool>,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `items` table and barcode index when missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    tracing::error!(operation, error = %err, "postgres item store failure");
    StoreError::Unavailable(format!("{operation}: {err}"))
}

fn row_to_item(row: &PgRow) -> Result<Item, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Corrupt(e.to_string());
    Ok(Item {
        id: ItemId::from_uuid(row.try_get::<uuid::Uuid, _>("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        item_type: row.try_get("item_type").map_err(decode)?,
        barcode: row.try_get("barcode").map_err(decode)?,
        condition: row.try_get("condition").map_err(decode)?,
        status: row.try_get("status").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        photo_path: row.try_get::<Option<String>, _>("photo_path").map_err(decode)?,
        is_active: row.try_get("is_active").map_err(decode)?,
        last_modified: row.try_get::<DateTime<Utc>, _>("last_modified").map_err(decode)?,
    })
}

#[async_trait::async_trait]
impl ItemStore for PostgresItemStore {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM items ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_all", e))?;
        rows.iter().map(row_to_item).collect()
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;
        row.as_ref().map(row_to_item).transpose()
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM items WHERE barcode = $1 ORDER BY id"
        ))
        .bind(barcode)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_barcode", e))?;
        rows.iter().map(row_to_item).collect()
    }

    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (
                id, name, item_type, barcode, condition, status,
                category, photo_path, is_active, last_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.item_type)
        .bind(&item.barcode)
        .bind(&item.condition)
        .bind(&item.status)
        .bind(&item.category)
        .bind(&item.photo_path)
        .bind(item.is_active)
        .bind(item.last_modified)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(item.id));
        }
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = $2,
                item_type = $3,
                barcode = $4,
                condition = $5,
                status = $6,
                category = $7,
                photo_path = $8,
                is_active = $9,
                last_modified = $10
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.item_type)
        .bind(&item.barcode)
        .bind(&item.condition)
        .bind(&item.status)
        .bind(&item.category)
        .bind(&item.photo_path)
        .bind(item.is_active)
        .bind(item.last_modified)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }
}
