//! Engine error taxonomy
//!
//! Store errors are remapped into caller-meaningful variants at the engine
//! boundary; anything infrastructural stays wrapped as `Storage`. The
//! `AppError` conversion is where variants pick up their error codes and
//! structured details.

use crate::store::StoreError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(u64),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: u64,
        requested: i32,
        available: i32,
    },

    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("Validation failed on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CustomerNotFound(id) => EngineError::CustomerNotFound(id),
            StoreError::ProductNotFound(id) => EngineError::ProductNotFound(id),
            StoreError::OrderNotFound(id) => EngineError::OrderNotFound(id),
            StoreError::InsufficientStock {
                product_id,
                requested,
                available,
            } => EngineError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            StoreError::Duplicate(field, value) => EngineError::Duplicate { field, value },
            other => EngineError::Storage(other),
        }
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "payload".to_string());
        EngineError::Validation {
            field,
            reason: errors.to_string(),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::CustomerNotFound(id) => {
                AppError::with_message(ErrorCode::CustomerNotFound, message)
                    .with_detail("customer_id", id)
            }
            EngineError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("product_id", id)
            }
            EngineError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message)
                    .with_detail("order_id", id)
            }
            EngineError::InsufficientStock {
                product_id,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("product_id", product_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            EngineError::Duplicate { field, value } => {
                let code = match field {
                    "email" => ErrorCode::DuplicateEmail,
                    "sku" => ErrorCode::DuplicateSku,
                    _ => ErrorCode::AlreadyExists,
                };
                AppError::with_message(code, message).with_detail(field, value)
            }
            EngineError::Validation { field, .. } => {
                AppError::with_message(ErrorCode::ValidationFailed, message)
                    .with_detail("field", field)
            }
            EngineError::Storage(store_err) => {
                // Transient transaction/IO failures are retryable by the
                // caller; everything else is a database-level fault.
                let code = match store_err {
                    StoreError::Transaction(_) | StoreError::Storage(_) => {
                        ErrorCode::StorageUnavailable
                    }
                    _ => ErrorCode::DatabaseError,
                };
                AppError::with_message(code, message)
            }
        }
    }
}
