//! Write path: operations posted to the web-hook script

pub mod operation;
pub mod operations;

pub use operation::{CellUpdates, Operation, OperationResult};
pub use operations::Operations;
