//! Order store
//!
//! Orders and their items live in separate tables but always move
//! together: creation, item replacement and deletion each happen inside a
//! write transaction supplied by the caller, so a crash or an error can
//! never leave an order without its items or items without their order.
//!
//! Items are keyed `(order_id, item_id)`, which makes "all items of an
//! order" a single range scan.

use super::{
    ORDER_COUNTER, ORDER_ITEM_COUNTER, ORDER_ITEMS_TABLE, ORDERS_TABLE, Store, StoreError,
    StoreResult,
};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use rust_decimal::Decimal;
use shared::models::{Order, OrderId, OrderItem, OrderStatus, ProductId};
use shared::util::now_millis;

/// A priced order line ready to be persisted
///
/// The unit price has already been snapshotted from the catalog by the
/// caller; the store treats it as opaque.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewItem {
    fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Clone)]
pub struct OrderStore {
    store: Store,
}

impl OrderStore {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// Persist a new order with its items (within transaction)
    ///
    /// The order total is derived from the items here, so a stored order
    /// can never disagree with the sum of its lines.
    pub fn create_order(
        &self,
        txn: &WriteTransaction,
        customer_id: u64,
        status: OrderStatus,
        items: &[NewItem],
    ) -> StoreResult<(Order, Vec<OrderItem>)> {
        let order_id = self.store.next_id(txn, ORDER_COUNTER)?;
        let now = now_millis();

        let mut stored_items = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;
        {
            let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
            for item in items {
                let item_id = self.store.next_id(txn, ORDER_ITEM_COUNTER)?;
                let record = OrderItem {
                    id: item_id,
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                };
                total += item.line_total();
                let value = serde_json::to_vec(&record)?;
                table.insert((order_id, item_id), value.as_slice())?;
                stored_items.push(record);
            }
        }

        let order = Order {
            id: order_id,
            customer_id,
            status,
            total,
            created_at: now,
            updated_at: now,
        };
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(&order)?;
        table.insert(order_id, value.as_slice())?;

        Ok((order, stored_items))
    }

    /// Get an order by id (read-only)
    pub fn get_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by id (within transaction)
    pub fn get_order_txn(&self, txn: &WriteTransaction, id: OrderId) -> StoreResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all items of an order, in item-id order (read-only)
    pub fn get_items(&self, order_id: OrderId) -> StoreResult<Vec<OrderItem>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for result in table.range((order_id, 0)..=(order_id, u64::MAX))? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    /// Get all items of an order, in item-id order (within transaction)
    pub fn get_items_txn(
        &self,
        txn: &WriteTransaction,
        order_id: OrderId,
    ) -> StoreResult<Vec<OrderItem>> {
        let table = txn.open_table(ORDER_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for result in table.range((order_id, 0)..=(order_id, u64::MAX))? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    /// Replace an order's full item set (within transaction)
    ///
    /// Returns the new items and the new total. The order record itself is
    /// not touched; the caller folds the total into `update_fields`.
    pub fn replace_items(
        &self,
        txn: &WriteTransaction,
        order_id: OrderId,
        items: &[NewItem],
    ) -> StoreResult<(Vec<OrderItem>, Decimal)> {
        let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;

        let mut old_keys = Vec::new();
        for result in table.range((order_id, 0)..=(order_id, u64::MAX))? {
            let (key, _value) = result?;
            old_keys.push(key.value());
        }
        for key in old_keys {
            table.remove(key)?;
        }

        let mut stored_items = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;
        for item in items {
            let item_id = self.store.next_id(txn, ORDER_ITEM_COUNTER)?;
            let record = OrderItem {
                id: item_id,
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            };
            total += item.line_total();
            let value = serde_json::to_vec(&record)?;
            table.insert((order_id, item_id), value.as_slice())?;
            stored_items.push(record);
        }

        Ok((stored_items, total))
    }

    /// Update order record fields (within transaction)
    ///
    /// Bumps `updated_at`; absent fields are left as they are.
    pub fn update_fields(
        &self,
        txn: &WriteTransaction,
        id: OrderId,
        customer_id: Option<u64>,
        status: Option<OrderStatus>,
        total: Option<Decimal>,
    ) -> StoreResult<Order> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let mut order: Order = match table.get(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StoreError::OrderNotFound(id)),
        };

        if let Some(customer_id) = customer_id {
            order.customer_id = customer_id;
        }
        if let Some(status) = status {
            order.status = status;
        }
        if let Some(total) = total {
            order.total = total;
        }
        order.updated_at = now_millis();

        let value = serde_json::to_vec(&order)?;
        table.insert(id, value.as_slice())?;
        Ok(order)
    }

    /// Delete an order and all its items as one unit (within transaction)
    ///
    /// Returns the removed records so the caller can report what was
    /// cancelled without a second read.
    pub fn delete_order(
        &self,
        txn: &WriteTransaction,
        id: OrderId,
    ) -> StoreResult<(Order, Vec<OrderItem>)> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let order: Order = match table.remove(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StoreError::OrderNotFound(id)),
        };
        drop(table);

        let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
        let mut items = Vec::new();
        let mut keys = Vec::new();
        for result in table.range((id, 0)..=(id, u64::MAX))? {
            let (key, value) = result?;
            keys.push(key.value());
            items.push(serde_json::from_slice(value.value())?);
        }
        for key in keys {
            table.remove(key)?;
        }

        Ok((order, items))
    }

    /// List orders, newest first, optionally filtered by status
    ///
    /// The returned total counts the filtered set, not the page.
    pub fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        per_page: u32,
    ) -> StoreResult<(Vec<Order>, u64)> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders: Vec<Order> = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if let Some(status) = status
                && order.status != status
            {
                continue;
            }
            orders.push(order);
        }

        let total = orders.len() as u64;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let orders = orders
            .into_iter()
            .skip(skip)
            .take(per_page as usize)
            .collect();
        Ok((orders, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn new_item(product_id: u64, quantity: i32, cents: i64) -> NewItem {
        NewItem {
            product_id,
            quantity,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_create_order_computes_total() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        let (order, items) = orders
            .create_order(
                &txn,
                1,
                OrderStatus::Pending,
                &[new_item(1, 2, 1000), new_item(2, 1, 550)],
            )
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(order.total, Decimal::new(2550, 2));
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id == order.id));

        let fetched = orders.get_order(order.id).unwrap().unwrap();
        assert_eq!(fetched.total, order.total);
        assert_eq!(orders.get_items(order.id).unwrap().len(), 2);
    }

    #[test]
    fn test_items_are_scoped_to_their_order() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        let (first, _) = orders
            .create_order(&txn, 1, OrderStatus::Pending, &[new_item(1, 1, 100)])
            .unwrap();
        let (second, _) = orders
            .create_order(
                &txn,
                1,
                OrderStatus::Pending,
                &[new_item(2, 1, 200), new_item(3, 1, 300)],
            )
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(orders.get_items(first.id).unwrap().len(), 1);
        assert_eq!(orders.get_items(second.id).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_items() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        let (order, _) = orders
            .create_order(&txn, 1, OrderStatus::Pending, &[new_item(1, 2, 1000)])
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        let (items, total) = orders
            .replace_items(&txn, order.id, &[new_item(2, 3, 400)])
            .unwrap();
        orders
            .update_fields(&txn, order.id, None, None, Some(total))
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(total, Decimal::new(1200, 2));

        let stored = orders.get_items(order.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].product_id, 2);
        assert_eq!(
            orders.get_order(order.id).unwrap().unwrap().total,
            Decimal::new(1200, 2)
        );
    }

    #[test]
    fn test_delete_order_removes_items() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        let (order, _) = orders
            .create_order(
                &txn,
                1,
                OrderStatus::Pending,
                &[new_item(1, 1, 100), new_item(2, 1, 200)],
            )
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        let (removed, removed_items) = orders.delete_order(&txn, order.id).unwrap();
        txn.commit().unwrap();

        assert_eq!(removed.id, order.id);
        assert_eq!(removed_items.len(), 2);
        assert!(orders.get_order(order.id).unwrap().is_none());
        assert!(orders.get_items(order.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_order() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        let result = orders.delete_order(&txn, 42);
        assert!(matches!(result, Err(StoreError::OrderNotFound(42))));
    }

    #[test]
    fn test_dropped_transaction_leaves_no_order() {
        let store = test_store();
        let orders = store.orders();

        let order_id = {
            let txn = store.begin_write().unwrap();
            let (order, _) = orders
                .create_order(&txn, 1, OrderStatus::Pending, &[new_item(1, 1, 100)])
                .unwrap();
            order.id
            // txn dropped without commit
        };

        assert!(orders.get_order(order_id).unwrap().is_none());
        assert!(orders.get_items(order_id).unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_filter_and_pagination() {
        let store = test_store();
        let orders = store.orders();

        let txn = store.begin_write().unwrap();
        for i in 0..4 {
            let status = if i % 2 == 0 {
                OrderStatus::Pending
            } else {
                OrderStatus::Shipped
            };
            orders
                .create_order(&txn, 1, status, &[new_item(1, 1, 100)])
                .unwrap();
        }
        txn.commit().unwrap();

        let (all, total) = orders.list_orders(None, 1, 10).unwrap();
        assert_eq!(total, 4);
        assert_eq!(all.len(), 4);
        // Newest first: ids descend on created_at ties
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));

        let (shipped, shipped_total) = orders.list_orders(Some(OrderStatus::Shipped), 1, 10).unwrap();
        assert_eq!(shipped_total, 2);
        assert!(shipped.iter().all(|o| o.status == OrderStatus::Shipped));

        let (page2, total) = orders.list_orders(None, 2, 3).unwrap();
        assert_eq!(total, 4);
        assert_eq!(page2.len(), 1);
    }
}
