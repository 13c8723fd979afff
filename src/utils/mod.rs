//! Utility functions backing the collection engine.
//!
//! ## Components
//!
//! - **Process**: external command execution with timeout and merged output
//! - **Store**: per-source artifact directories and pruning of empty ones
//! - **Summary**: JSON report of a collection run

/// External command execution
pub mod process;

/// Local artifact directory management
pub mod store;

/// Collection summary generation and reporting
pub mod summary;
