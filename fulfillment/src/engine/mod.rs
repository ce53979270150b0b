//! Order transaction engine
//!
//! Each public operation opens one write transaction, runs its action, and
//! commits only when every step succeeded. Errors drop the transaction and
//! with it every pending write, so callers observe either the whole effect
//! of an operation or none of it. redb admits a single write transaction at
//! a time, which serializes conflicting operations without any locking in
//! this layer.

pub mod actions;
pub mod error;

#[cfg(test)]
mod tests;

pub use error::{EngineError, EngineResult};

use crate::store::{CatalogStore, OrderStore, Store, StoreError};
use redb::WriteTransaction;
use shared::models::{
    CancelledOrder, OrderCreate, OrderId, OrderItem, OrderItemView, OrderStatus, OrderUpdate,
    OrderView,
};
use validator::Validate;

#[derive(Clone)]
pub struct OrderEngine {
    store: Store,
    catalog: CatalogStore,
    orders: OrderStore,
}

impl OrderEngine {
    pub fn new(store: Store) -> Self {
        let catalog = store.catalog();
        let orders = store.orders();
        Self {
            store,
            catalog,
            orders,
        }
    }

    /// Create an order: validate the payload, snapshot prices, reserve
    /// stock and persist the order with its items, atomically.
    pub fn create_order(&self, request: OrderCreate) -> EngineResult<OrderView> {
        request.validate()?;

        let txn = self.store.begin_write()?;
        let order_id = actions::create_order::execute(self, &txn, &request)?;
        let view = self.materialize(&txn, order_id)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id, total = %view.total, "Order created");
        Ok(view)
    }

    /// Update an order: optionally reassign the customer, rewrite the
    /// status, or replace the full item set (releasing the old reservation
    /// and taking a new one), atomically.
    pub fn update_order(&self, order_id: OrderId, request: OrderUpdate) -> EngineResult<OrderView> {
        request.validate()?;

        let txn = self.store.begin_write()?;
        actions::update_order::execute(self, &txn, order_id, &request)?;
        let view = self.materialize(&txn, order_id)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id, total = %view.total, "Order updated");
        Ok(view)
    }

    /// Cancel an order: delete it with its items and restore the reserved
    /// stock. Items whose product no longer exists are reported as restock
    /// warnings instead of failing the cancellation.
    pub fn cancel_order(&self, order_id: OrderId) -> EngineResult<CancelledOrder> {
        let txn = self.store.begin_write()?;
        let (mut order, items, restock_warnings) =
            actions::cancel_order::execute(self, &txn, order_id)?;

        // Snapshot for the caller; the record itself is already gone.
        order.status = OrderStatus::Cancelled;
        let customer = self
            .catalog
            .get_customer_txn(&txn, order.customer_id)?
            .ok_or(EngineError::CustomerNotFound(order.customer_id))?;
        let items = self.item_views(&txn, &items)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(
            order_id,
            warnings = restock_warnings.len(),
            "Order cancelled"
        );
        Ok(CancelledOrder {
            order: OrderView {
                id: order.id,
                customer,
                status: order.status,
                total: order.total,
                created_at: order.created_at,
                updated_at: order.updated_at,
                items,
            },
            restock_warnings,
        })
    }

    /// Get a fully materialized order
    ///
    /// Reads go through a write transaction so the order, its customer and
    /// its items come from one snapshot; the transaction is dropped without
    /// committing.
    pub fn get_order(&self, order_id: OrderId) -> EngineResult<OrderView> {
        let txn = self.store.begin_write()?;
        self.materialize(&txn, order_id)
    }

    pub(crate) fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub(crate) fn orders(&self) -> &OrderStore {
        &self.orders
    }

    /// Assemble the full order view within the given transaction
    fn materialize(&self, txn: &WriteTransaction, order_id: OrderId) -> EngineResult<OrderView> {
        let order = self
            .orders
            .get_order_txn(txn, order_id)?
            .ok_or(EngineError::OrderNotFound(order_id))?;
        let customer = self
            .catalog
            .get_customer_txn(txn, order.customer_id)?
            .ok_or(EngineError::CustomerNotFound(order.customer_id))?;
        let items = self.orders.get_items_txn(txn, order_id)?;
        let items = self.item_views(txn, &items)?;

        Ok(OrderView {
            id: order.id,
            customer,
            status: order.status,
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
        })
    }

    /// Resolve item records against the catalog
    ///
    /// A missing product yields `product: None`; the stored snapshot fields
    /// still describe what was sold.
    fn item_views(
        &self,
        txn: &WriteTransaction,
        items: &[OrderItem],
    ) -> EngineResult<Vec<OrderItemView>> {
        let mut views = Vec::with_capacity(items.len());
        for item in items {
            let product = self.catalog.get_product_txn(txn, item.product_id)?;
            views.push(OrderItemView {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total(),
                product,
            });
        }
        Ok(views)
    }
}
