//! The persisted counter document: one JSON object mapping names to counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a stored counter document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Stored bytes do not parse as a name -> non-negative integer object
    #[error("stored document is not a name/count mapping: {reason}")]
    Malformed { reason: String },
}

/// Mapping from name to the number of times it has been seen.
///
/// Serialized in its entirety as a single JSON object literal, e.g.
/// `{"alice":2,"bob":1}`. A BTreeMap keeps the serialized key order
/// deterministic within a call; key order carries no meaning.
///
/// Invariant: every key present has a count of at least 1. Names enter the
/// map at 0 and are incremented in the same `record` call, so a zero count
/// is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterDocument {
    counts: BTreeMap<String, u64>,
}

impl CounterDocument {
    /// The empty document - what an absent blob reads as.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `name`.
    ///
    /// A name appearing twice in one batch goes through here twice and
    /// contributes two increments.
    pub fn record(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Occurrences seen for `name`; 0 for names never recorded.
    pub fn count_of(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Decode a stored document.
    ///
    /// Anything that is not a JSON object of string to non-negative integer
    /// is rejected. The caller must surface this rather than fall back to an
    /// empty document - a silent reset would discard every prior count.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        serde_json::from_slice(bytes).map_err(|e| DocumentError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Encode as a UTF-8 JSON object literal.
    pub fn to_vec(&self) -> Vec<u8> {
        // Serialization of a string->u64 map cannot fail
        serde_json::to_vec(&self.counts).expect("counter document serialization")
    }
}
