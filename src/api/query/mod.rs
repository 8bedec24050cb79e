//! Read path: sheet queries and their decoded results

pub mod query;
pub mod result;

pub use query::Query;
pub use result::{QueryResponse, QueryResult};
