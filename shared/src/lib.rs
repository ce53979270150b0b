//! Shared types for the fulfillment backend
//!
//! Domain models, request DTOs, the unified error taxonomy and
//! pagination response structures used across crates.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, ErrorCode};
pub use response::{PaginatedResponse, Pagination};
pub use serde::{Deserialize, Serialize};
