//! Read-only query façade
//!
//! Paginated listings over the same store the engine writes to. Listings
//! materialize each order the same way the engine does, so a row in a list
//! and the result of a single fetch always agree in shape.

use crate::engine::{EngineError, EngineResult};
use crate::store::Store;
use shared::PaginatedResponse;
use shared::models::{Customer, OrderItemView, OrderStatus, OrderView};

#[derive(Clone)]
pub struct OrderQuery {
    store: Store,
}

impl OrderQuery {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List orders newest first, optionally filtered by status
    ///
    /// `pagination.total` counts the filtered set; a page past the end is
    /// simply empty.
    pub fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        per_page: u32,
    ) -> EngineResult<PaginatedResponse<OrderView>> {
        let orders = self.store.orders();
        let catalog = self.store.catalog();
        let (records, total) = orders.list_orders(status, page, per_page)?;

        let mut views = Vec::with_capacity(records.len());
        for order in records {
            let customer = catalog
                .get_customer(order.customer_id)?
                .ok_or(EngineError::CustomerNotFound(order.customer_id))?;

            let mut items = Vec::new();
            for item in orders.get_items(order.id)? {
                let product = catalog.get_product(item.product_id)?;
                items.push(OrderItemView {
                    id: item.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                    product,
                });
            }

            views.push(OrderView {
                id: order.id,
                customer,
                status: order.status,
                total: order.total,
                created_at: order.created_at,
                updated_at: order.updated_at,
                items,
            });
        }

        Ok(PaginatedResponse::new(views, page, per_page, total))
    }

    /// List customers newest first
    pub fn list_customers(
        &self,
        page: u32,
        per_page: u32,
    ) -> EngineResult<PaginatedResponse<Customer>> {
        let (customers, total) = self.store.catalog().list_customers(page, per_page)?;
        Ok(PaginatedResponse::new(customers, page, per_page, total))
    }
}
