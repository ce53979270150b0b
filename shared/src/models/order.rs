//! Order Model
//!
//! Orders own their items: items are created and deleted with their parent
//! order and are never shared between orders. Each item carries a price
//! snapshot — the unit price captured when the item was created, decoupled
//! from later catalog price changes.

use super::customer::{Customer, CustomerId};
use super::product::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub type OrderId = u64;
pub type OrderItemId = u64;

/// Order status enum
///
/// `Delivered` and `Cancelled` are terminal by convention. Transitions are
/// advisory: the engine accepts any status write (cancellation is the one
/// path that actually removes an order).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether no further transition is expected from this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Order entity
///
/// `total` always equals the sum of the order's item subtotals; it is
/// computed by the engine and never accepted from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order item entity
///
/// `unit_price` is the price snapshot taken from the product at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Subtotal for this line (`unit_price × quantity`)
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Request payloads
// =============================================================================

/// A requested order line: which product, how many units
///
/// The unit price is not part of the request — the engine snapshots the
/// product's current catalog price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub customer_id: CustomerId,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemInput>,
    /// Initial status; defaults to `Pending`
    pub status: Option<OrderStatus>,
}

/// Update order payload
///
/// Supplying `items` replaces the full item set (not a merge); the stock
/// held by the old items is released before the new set is reserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<OrderItemInput>>,
}

// =============================================================================
// View types (engine output contract)
// =============================================================================

/// Order item with its referenced product resolved
///
/// `product` is `None` when the catalog row was deleted by a collaborator
/// after the item was created; the snapshot fields remain authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub product: Option<Product>,
}

/// Fully materialized order: the record plus its customer and items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer: Customer,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
    pub items: Vec<OrderItemView>,
}

/// Warning emitted when cancellation could not restore stock for an item
/// because the product no longer exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockWarning {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Result of a cancellation: the deleted order snapshot plus any
/// stock-restoration discrepancies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelledOrder {
    pub order: OrderView,
    pub restock_warnings: Vec<RestockWarning>,
}
