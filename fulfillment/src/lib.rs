//! Order fulfillment backend
//!
//! The transactional core of the retail catalog: stores for customers,
//! products and orders over a single embedded database, the order
//! transaction engine that keeps stock, totals and item records consistent,
//! and a read-only query façade for paginated listings.
//!
//! # Atomicity
//!
//! Every engine operation runs inside one write transaction spanning the
//! catalog and order stores. The transaction commits only after both the
//! validation pass and the commit pass succeed; any failure drops the
//! transaction, leaving zero observable side effects.

pub mod config;
pub mod engine;
pub mod logger;
pub mod query;
pub mod store;

pub use config::Config;
pub use engine::{EngineError, EngineResult, OrderEngine};
pub use query::OrderQuery;
pub use store::{CatalogStore, OrderStore, Store, StoreError};
