// namecount-core - Platform-agnostic counter document model
//
// This crate contains the PURE data model for the per-name occurrence
// counts. No I/O, no async, no runtime dependencies - the storage cycle
// around it lives in namecount-store.

mod document;

pub use document::{CounterDocument, DocumentError};
