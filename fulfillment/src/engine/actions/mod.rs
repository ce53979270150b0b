//! Engine actions
//!
//! One module per mutating operation. An action runs entirely inside the
//! transaction handed to it and never commits; the engine owns the commit
//! so that materialization happens on the same snapshot as the writes.

pub(crate) mod cancel_order;
pub(crate) mod create_order;
pub(crate) mod update_order;
