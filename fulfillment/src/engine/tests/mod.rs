//! Engine test suite
//!
//! Every test runs against a fresh in-memory store, so tests are fully
//! isolated and need no cleanup.

mod test_boundary;
mod test_concurrency;

use crate::engine::OrderEngine;
use crate::store::Store;
use rust_decimal::Decimal;
use shared::models::{Customer, CustomerCreate, OrderItemInput, Product, ProductCreate};

fn create_test_engine() -> (OrderEngine, Store) {
    let store = Store::open_in_memory().unwrap();
    let engine = OrderEngine::new(store.clone());
    (engine, store)
}

fn seed_customer(store: &Store, email: &str) -> Customer {
    store
        .catalog()
        .create_customer(CustomerCreate {
            name: "Test Customer".to_string(),
            email: email.to_string(),
            phone: None,
            address: None,
        })
        .unwrap()
}

fn seed_product(store: &Store, sku: &str, price_cents: i64, stock: i32) -> Product {
    store
        .catalog()
        .create_product(ProductCreate {
            name: format!("Product {}", sku),
            description: None,
            price: Decimal::new(price_cents, 2),
            sku: sku.to_string(),
            stock,
        })
        .unwrap()
}

fn line(product_id: u64, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity,
    }
}

fn stock_of(store: &Store, product_id: u64) -> i32 {
    store
        .catalog()
        .get_product(product_id)
        .unwrap()
        .unwrap()
        .stock
}
