//! Common utilities for the epic site tool.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated diagnostics for recoverable problems

pub mod warning;
