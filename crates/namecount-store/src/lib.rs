//! Name counter store
//!
//! Owns the persisted counter document: load the current document from
//! object storage, fold a batch of name occurrences into it, and write it
//! back under the same fixed key.
//!
//! The cycle is deliberately unconditional (no compare-and-swap, no version
//! token): two concurrent callers can both read the same base document and
//! the second write discards the first writer's additions. Callers that need
//! correctness under concurrency must serialize their calls through a single
//! consumer, which is what the server drain loop does.

mod error;
mod operator;
mod store;

pub use error::{Result, StoreError};
pub use operator::operator_from_config;
pub use store::CounterStore;
