//! Unified error handling
//!
//! [`ErrorCode`] is the cross-layer taxonomy; [`AppError`] carries a code,
//! a message and optional structured details to the caller.

mod codes;
mod types;

pub use codes::ErrorCode;
pub use types::AppError;
