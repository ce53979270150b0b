//! Domain models
//!
//! Entity structs with their Create/Update payloads and the view types
//! returned by the engine, colocated per entity.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerCreate, CustomerId, CustomerUpdate};
pub use order::{
    CancelledOrder, Order, OrderCreate, OrderId, OrderItem, OrderItemId, OrderItemInput,
    OrderItemView, OrderStatus, OrderUpdate, OrderView, RestockWarning,
};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
