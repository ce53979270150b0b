//! Update-order action

use crate::engine::{EngineError, EngineResult, OrderEngine};
use crate::store::StoreError;
use crate::store::orders::NewItem;
use redb::WriteTransaction;
use shared::models::{OrderId, OrderUpdate};

/// Apply field changes and, when a new item set is supplied, swap the
/// order's stock reservation.
///
/// Replacement releases the old reservation first, so an update that keeps
/// a product but raises its quantity only needs the difference to be in
/// stock. Prices are re-snapshotted from the catalog for every new line.
pub(crate) fn execute(
    engine: &OrderEngine,
    txn: &WriteTransaction,
    order_id: OrderId,
    request: &OrderUpdate,
) -> EngineResult<()> {
    engine
        .orders()
        .get_order_txn(txn, order_id)?
        .ok_or(EngineError::OrderNotFound(order_id))?;

    if let Some(customer_id) = request.customer_id {
        engine
            .catalog()
            .get_customer_txn(txn, customer_id)?
            .ok_or(EngineError::CustomerNotFound(customer_id))?;
    }

    let mut new_total = None;
    if let Some(lines) = &request.items {
        let old_items = engine.orders().get_items_txn(txn, order_id)?;
        for item in &old_items {
            match engine
                .catalog()
                .adjust_stock(txn, item.product_id, item.quantity)
            {
                Ok(_) => {}
                Err(StoreError::ProductNotFound(product_id)) => {
                    // Product deleted since the item was created; its units
                    // cannot be returned anywhere.
                    tracing::warn!(
                        order_id,
                        product_id,
                        quantity = item.quantity,
                        "Stock not restored for deleted product"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let product = engine
                .catalog()
                .get_product_txn(txn, line.product_id)?
                .ok_or(EngineError::ProductNotFound(line.product_id))?;
            if product.stock < line.quantity {
                return Err(EngineError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            items.push(NewItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        for item in &items {
            engine
                .catalog()
                .adjust_stock(txn, item.product_id, -item.quantity)?;
        }

        let (_, total) = engine.orders().replace_items(txn, order_id, &items)?;
        new_total = Some(total);
    }

    engine
        .orders()
        .update_fields(txn, order_id, request.customer_id, request.status, new_total)?;
    Ok(())
}
