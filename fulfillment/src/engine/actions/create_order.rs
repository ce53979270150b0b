//! Create-order action

use crate::engine::{EngineError, EngineResult, OrderEngine};
use crate::store::orders::NewItem;
use redb::WriteTransaction;
use shared::models::{OrderCreate, OrderId, OrderStatus};

/// Validate the request against the catalog, then reserve stock and persist
/// the order with its items.
///
/// The validation pass reads only; it reports the first unknown product or
/// short line before anything is written. The reserve pass re-checks each
/// decrement conditionally, which also covers several lines of the same
/// product whose combined quantity exceeds stock.
pub(crate) fn execute(
    engine: &OrderEngine,
    txn: &WriteTransaction,
    request: &OrderCreate,
) -> EngineResult<OrderId> {
    engine
        .catalog()
        .get_customer_txn(txn, request.customer_id)?
        .ok_or(EngineError::CustomerNotFound(request.customer_id))?;

    let mut items = Vec::with_capacity(request.items.len());
    for line in &request.items {
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

    let status = request.status.unwrap_or(OrderStatus::Pending);
    let (order, _) = engine
        .orders()
        .create_order(txn, request.customer_id, status, &items)?;
    Ok(order.id)
}
