//! MongoDB connection management and reads.
//!
//! This module provides:
//! - `ConnectionManager`: the lazily created, process-shared client and name resolution
//! - `query`: the unfiltered find-all read used by exports

pub mod manager;
pub mod query;

pub use manager::ConnectionManager;
