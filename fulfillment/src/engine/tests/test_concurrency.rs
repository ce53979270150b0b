//! Concurrent access
//!
//! The engine is `Clone` and every clone shares the same database, so
//! these tests hammer one store from several threads and assert the stock
//! arithmetic stays exact.

use super::*;
use crate::engine::EngineError;
use shared::models::OrderCreate;
use std::thread;

#[test]
fn test_concurrent_orders_never_oversell() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 10);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let customer_id = customer.id;
            let product_id = widget.id;
            thread::spawn(move || {
                engine.create_order(OrderCreate {
                    customer_id,
                    items: vec![line(product_id, 3)],
                    status: None,
                })
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => successes += 1,
            Err(EngineError::InsufficientStock { .. }) => {}
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    // 10 units, 3 per order: exactly 3 orders fit
    assert_eq!(successes, 3);
    assert_eq!(stock_of(&store, widget.id), 10 - 3 * successes);

    let (orders, total) = store.orders().list_orders(None, 1, 100).unwrap();
    assert_eq!(total, 3);
    assert_eq!(orders.len(), 3);
}

#[test]
fn test_race_for_last_unit() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 1);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let engine = engine.clone();
            let customer_id = customer.id;
            let product_id = widget.id;
            thread::spawn(move || {
                engine.create_order(OrderCreate {
                    customer_id,
                    items: vec![line(product_id, 1)],
                    status: None,
                })
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(EngineError::InsufficientStock { available: 0, .. })
    )));
    assert_eq!(stock_of(&store, widget.id), 0);
}

#[test]
fn test_concurrent_create_and_cancel_conserve_stock() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 20);

    // Pre-create some orders to cancel concurrently with new creations
    let existing: Vec<_> = (0..4)
        .map(|_| {
            engine
                .create_order(OrderCreate {
                    customer_id: customer.id,
                    items: vec![line(widget.id, 2)],
                    status: None,
                })
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(stock_of(&store, widget.id), 12);

    let mut handles = Vec::new();
    for order_id in existing {
        let engine = engine.clone();
        handles.push(thread::spawn(move || {
            engine.cancel_order(order_id).map(|_| ())
        }));
    }
    for _ in 0..4 {
        let engine = engine.clone();
        let customer_id = customer.id;
        let product_id = widget.id;
        handles.push(thread::spawn(move || {
            engine
                .create_order(OrderCreate {
                    customer_id,
                    items: vec![line(product_id, 2)],
                    status: None,
                })
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // 4 cancelled, 4 created: reservation level is unchanged
    assert_eq!(stock_of(&store, widget.id), 12);
    let (_, total) = store.orders().list_orders(None, 1, 100).unwrap();
    assert_eq!(total, 4);
}
