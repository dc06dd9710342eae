//! Counter store module
//!
//! - [`CounterStore`] - persistent category → sequence mapping
//! - [`CounterError`] - store errors

pub mod store;

pub use store::{CounterError, CounterResult, CounterStore, Counters, RESET_ALL, load};
