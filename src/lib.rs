//! Production tracking over a spreadsheet: typed reads through the tabular
//! query endpoint, per-stage pending/history views and column-addressed
//! write-back through a web-hook script.

pub mod api;
pub mod config;
pub mod sheet;
pub mod workflow;
