//! redb-based storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `customers` | `customer_id` | `Customer` | Customer records |
//! | `products` | `product_id` | `Product` | Product records |
//! | `orders` | `order_id` | `Order` | Order records |
//! | `order_items` | `(order_id, item_id)` | `OrderItem` | Items owned by their order |
//! | `customer_email_index` | `email` | `customer_id` | Email uniqueness |
//! | `product_sku_index` | `sku` | `product_id` | SKU uniqueness |
//! | `counters` | name | `u64` | Per-entity id sequences |
//!
//! All records are stored as JSON values. Mutating methods take a
//! `&WriteTransaction` so that one transaction can span the catalog and
//! order stores; redb's single-writer model serializes those transactions,
//! which is what makes the engine's check-then-decrement atomic.

pub mod catalog;
pub mod orders;

pub use catalog::CatalogStore;
pub use orders::OrderStore;

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Customer records: key = customer_id, value = JSON-serialized Customer
pub(crate) const CUSTOMERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("customers");

/// Product records: key = product_id, value = JSON-serialized Product
pub(crate) const PRODUCTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("products");

/// Order records: key = order_id, value = JSON-serialized Order
pub(crate) const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Order items: key = (order_id, item_id), value = JSON-serialized OrderItem
pub(crate) const ORDER_ITEMS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("order_items");

/// Email uniqueness index: key = email, value = customer_id
pub(crate) const EMAIL_INDEX_TABLE: TableDefinition<&str, u64> =
    TableDefinition::new("customer_email_index");

/// SKU uniqueness index: key = sku, value = product_id
pub(crate) const SKU_INDEX_TABLE: TableDefinition<&str, u64> =
    TableDefinition::new("product_sku_index");

/// Id counters: key = entity name, value = last allocated id
pub(crate) const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub(crate) const CUSTOMER_COUNTER: &str = "customer";
pub(crate) const PRODUCT_COUNTER: &str = "product";
pub(crate) const ORDER_COUNTER: &str = "order";
pub(crate) const ORDER_ITEM_COUNTER: &str = "order_item";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate {0}: {1}")]
    Duplicate(&'static str, String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(u64),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: u64,
        requested: i32,
        available: i32,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage handle owning the embedded database
///
/// Cloning is cheap (`Arc`); all clones share the same database and
/// therefore the same write-transaction serialization.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns, using
    /// copy-on-write with an atomic pointer swap, so the file is always in
    /// a consistent state even across power loss.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(CUSTOMERS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let _ = write_txn.open_table(EMAIL_INDEX_TABLE)?;
            let _ = write_txn.open_table(SKU_INDEX_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    ///
    /// Blocks while another write transaction is in flight; this is the
    /// serialization point for all mutating operations.
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Access the catalog store view over this database
    pub fn catalog(&self) -> CatalogStore {
        CatalogStore::new(self.clone())
    }

    /// Access the order store view over this database
    pub fn orders(&self) -> OrderStore {
        OrderStore::new(self.clone())
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Allocate the next id for the given counter (within transaction)
    pub(crate) fn next_id(&self, txn: &WriteTransaction, counter: &str) -> StoreResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(counter)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(counter, next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_allocation_is_monotonic() {
        let store = Store::open_in_memory().unwrap();

        let txn = store.begin_write().unwrap();
        let a = store.next_id(&txn, ORDER_COUNTER).unwrap();
        let b = store.next_id(&txn, ORDER_COUNTER).unwrap();
        txn.commit().unwrap();

        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let txn = store.begin_write().unwrap();
        let c = store.next_id(&txn, ORDER_COUNTER).unwrap();
        txn.commit().unwrap();
        assert_eq!(c, 3);
    }

    #[test]
    fn test_counters_are_independent() {
        let store = Store::open_in_memory().unwrap();

        let txn = store.begin_write().unwrap();
        let order_id = store.next_id(&txn, ORDER_COUNTER).unwrap();
        let product_id = store.next_id(&txn, PRODUCT_COUNTER).unwrap();
        txn.commit().unwrap();

        assert_eq!(order_id, 1);
        assert_eq!(product_id, 1);
    }

    #[test]
    fn test_dropped_transaction_rolls_back_counter() {
        let store = Store::open_in_memory().unwrap();

        {
            let txn = store.begin_write().unwrap();
            store.next_id(&txn, ORDER_COUNTER).unwrap();
            // dropped without commit
        }

        let txn = store.begin_write().unwrap();
        let id = store.next_id(&txn, ORDER_COUNTER).unwrap();
        txn.commit().unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fulfillment.redb");

        {
            let store = Store::open(&path).unwrap();
            let txn = store.begin_write().unwrap();
            store.next_id(&txn, CUSTOMER_COUNTER).unwrap();
            txn.commit().unwrap();
        }

        // Reopen: counter state survives
        let store = Store::open(&path).unwrap();
        let txn = store.begin_write().unwrap();
        let id = store.next_id(&txn, CUSTOMER_COUNTER).unwrap();
        txn.commit().unwrap();
        assert_eq!(id, 2);
    }
}
