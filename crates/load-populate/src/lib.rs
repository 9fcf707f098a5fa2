//! Common types and utilities for random-data-load populators.
//!
//! This crate holds the load-shaping arguments (row target, bulk size,
//! concurrency, retry budget, generation tunables) shared by every populator
//! front end, independent of how the target database is reached.

pub mod args;

pub use args::{default_concurrency, CommonPopulateArgs};
