//! Edge cases around validation and stock boundaries

use super::*;
use crate::engine::EngineError;
use rust_decimal::Decimal;
use shared::models::{OrderCreate, OrderUpdate};

#[test]
fn test_empty_items_rejected() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");

    let result = engine.create_order(OrderCreate {
        customer_id: customer.id,
        items: vec![],
        status: None,
    });
    assert!(matches!(result, Err(EngineError::Validation { .. })));
}

#[test]
fn test_zero_quantity_rejected() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 5);

    let result = engine.create_order(OrderCreate {
        customer_id: customer.id,
        items: vec![line(widget.id, 0)],
        status: None,
    });
    assert!(matches!(result, Err(EngineError::Validation { .. })));
    assert_eq!(stock_of(&store, widget.id), 5);
}

#[test]
fn test_update_with_empty_item_set_rejected() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 5);

    let order = engine
        .create_order(OrderCreate {
            customer_id: customer.id,
            items: vec![line(widget.id, 2)],
            status: None,
        })
        .unwrap();

    let result = engine.update_order(
        order.id,
        OrderUpdate {
            items: Some(vec![]),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(EngineError::Validation { .. })));

    // Untouched
    assert_eq!(stock_of(&store, widget.id), 3);
    assert_eq!(engine.get_order(order.id).unwrap().items.len(), 1);
}

#[test]
fn test_duplicate_lines_combined_exceed_stock() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 5);

    // Each line fits on its own; together they need 6 of 5
    let result = engine.create_order(OrderCreate {
        customer_id: customer.id,
        items: vec![line(widget.id, 3), line(widget.id, 3)],
        status: None,
    });
    match result {
        Err(EngineError::InsufficientStock {
            product_id,
            requested,
            available,
        }) => {
            assert_eq!(product_id, widget.id);
            assert_eq!(requested, 3);
            assert_eq!(available, 2);
        }
        other => panic!("Expected InsufficientStock, got {:?}", other),
    }

    // The first line's decrement was rolled back with the transaction
    assert_eq!(stock_of(&store, widget.id), 5);
    let (orders, _) = store.orders().list_orders(None, 1, 10).unwrap();
    assert!(orders.is_empty());
}

#[test]
fn test_duplicate_lines_within_stock() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 6);

    let view = engine
        .create_order(OrderCreate {
            customer_id: customer.id,
            items: vec![line(widget.id, 3), line(widget.id, 3)],
            status: None,
        })
        .unwrap();

    assert_eq!(view.items.len(), 2);
    assert_eq!(view.total, Decimal::new(6000, 2));
    assert_eq!(stock_of(&store, widget.id), 0);
}

#[test]
fn test_exact_stock_boundary() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 3);

    engine
        .create_order(OrderCreate {
            customer_id: customer.id,
            items: vec![line(widget.id, 3)],
            status: None,
        })
        .unwrap();
    assert_eq!(stock_of(&store, widget.id), 0);

    let result = engine.create_order(OrderCreate {
        customer_id: customer.id,
        items: vec![line(widget.id, 1)],
        status: None,
    });
    assert!(matches!(
        result,
        Err(EngineError::InsufficientStock { available: 0, .. })
    ));
}

#[test]
fn test_failed_multi_line_order_leaves_no_partial_reservation() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 10);
    let gadget = seed_product(&store, "G-1", 500, 1);

    let result = engine.create_order(OrderCreate {
        customer_id: customer.id,
        items: vec![line(widget.id, 5), line(gadget.id, 2)],
        status: None,
    });
    assert!(matches!(
        result,
        Err(EngineError::InsufficientStock { .. })
    ));

    assert_eq!(stock_of(&store, widget.id), 10);
    assert_eq!(stock_of(&store, gadget.id), 1);
}

#[test]
fn test_failed_update_keeps_old_items_and_stock() {
    let (engine, store) = create_test_engine();
    let customer = seed_customer(&store, "ada@example.com");
    let widget = seed_product(&store, "W-1", 1000, 10);
    let gadget = seed_product(&store, "G-1", 500, 1);

    let order = engine
        .create_order(OrderCreate {
            customer_id: customer.id,
            items: vec![line(widget.id, 4)],
            status: None,
        })
        .unwrap();

    // The release inside the transaction is rolled back along with it
    let result = engine.update_order(
        order.id,
        OrderUpdate {
            items: Some(vec![line(gadget.id, 5)]),
            ..Default::default()
        },
    );
    assert!(matches!(
        result,
        Err(EngineError::InsufficientStock { .. })
    ));

    assert_eq!(stock_of(&store, widget.id), 6);
    assert_eq!(stock_of(&store, gadget.id), 1);
    let view = engine.get_order(order.id).unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product_id, widget.id);
    assert_eq!(view.total, order.total);
}
