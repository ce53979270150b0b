//! Cancel-order action

use crate::engine::{EngineError, EngineResult, OrderEngine};
use crate::store::StoreError;
use redb::WriteTransaction;
use shared::models::{Order, OrderId, OrderItem, RestockWarning};

/// Delete the order with its items and return the reserved units to stock.
///
/// A deleted product cannot take its units back; that line becomes a
/// restock warning rather than an error, since refusing the cancellation
/// would strand the order forever.
pub(crate) fn execute(
    engine: &OrderEngine,
    txn: &WriteTransaction,
    order_id: OrderId,
) -> EngineResult<(Order, Vec<OrderItem>, Vec<RestockWarning>)> {
    let (order, items) = match engine.orders().delete_order(txn, order_id) {
        Ok(deleted) => deleted,
        Err(StoreError::OrderNotFound(id)) => return Err(EngineError::OrderNotFound(id)),
        Err(err) => return Err(err.into()),
    };

    let mut warnings = Vec::new();
    for item in &items {
        match engine
            .catalog()
            .adjust_stock(txn, item.product_id, item.quantity)
        {
            Ok(_) => {}
            Err(StoreError::ProductNotFound(product_id)) => {
                tracing::warn!(
                    order_id,
                    product_id,
                    quantity = item.quantity,
                    "Stock not restored for deleted product"
                );
                warnings.push(RestockWarning {
                    product_id,
                    quantity: item.quantity,
                });
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok((order, items, warnings))
}
