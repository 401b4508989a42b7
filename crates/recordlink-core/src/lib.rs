// Public fallible APIs in this crate share one concrete error contract (`LinkError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod client;
pub mod engine;
pub mod error;
pub(crate) mod expiry;
pub(crate) mod frontier;
pub(crate) mod matcher;
pub mod metrics;
pub mod models;
pub mod normalize;
pub(crate) mod ocr;
pub(crate) mod traversal;
pub(crate) mod trie;

pub use client::RecordLink;
pub use engine::MatcherCore;
pub use error::{LinkError, Result};
pub use models::{
    EngineParams, Field, FieldParams, Match, MatchCandidate, Metric, RecordEntry, RecordKey,
    RecordSource, SearchParams,
};
