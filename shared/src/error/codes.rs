//! Unified error codes for the fulfillment backend
//!
//! Error codes are shared between the engine and its callers so that the
//! presentation layer never has to parse messages. Organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Customer errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,

    // ==================== 5xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 5001,
    /// Customer email already registered
    DuplicateEmail = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Not enough stock to satisfy the request
    InsufficientStock = 6002,
    /// Product SKU already registered
    DuplicateSku = 6003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9001,
    /// Storage temporarily unavailable
    StorageUnavailable = 9002,
    /// Internal error
    InternalError = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::DuplicateEmail => "Customer email already registered",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::InsufficientStock => "Not enough stock",
            ErrorCode::DuplicateSku => "Product SKU already registered",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageUnavailable => "Storage temporarily unavailable",
            ErrorCode::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            4001 => Ok(ErrorCode::OrderNotFound),
            5001 => Ok(ErrorCode::CustomerNotFound),
            5002 => Ok(ErrorCode::DuplicateEmail),
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::InsufficientStock),
            6003 => Ok(ErrorCode::DuplicateSku),
            9001 => Ok(ErrorCode::DatabaseError),
            9002 => Ok(ErrorCode::StorageUnavailable),
            9003 => Ok(ErrorCode::InternalError),
            _ => Err(format!("Unknown error code: {}", value)),
        }
    }
}
