//! Spreadsheet API module
//!
//! Reads go through the public tabular-query endpoint and come back as
//! positional tables. Writes are form-encoded POSTs to a web-hook script
//! that accepts `insert`, `updateCells` and `updateByJobCard` actions.

pub mod client;
pub mod constants;
pub mod error;
pub mod manager;
pub mod operations;
pub mod query;
pub mod resilience;

pub use client::SheetsClient;
pub use error::ApiError;
pub use manager::ClientManager;
pub use operations::{CellUpdates, Operation, OperationResult, Operations};
pub use query::{Query, QueryResponse, QueryResult};
pub use resilience::{ResilienceConfig, RetryConfig, RetryPolicy, RetryableError};
