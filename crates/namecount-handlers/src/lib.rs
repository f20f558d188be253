//! Shared request handling for namecount ingestion
//!
//! This crate provides the platform-neutral greet and drain logic plus a
//! unified error classification, used by both the Lambda adapter and the
//! self-hosted server.

mod drain;
mod error;
mod greet;

pub use drain::{handle_drain, DrainReport};
pub use error::HandlerError;
pub use greet::{greeting_page, handle_greet};
