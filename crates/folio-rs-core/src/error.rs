//! Error types for the document core.

use folio_rs_protocol::EndpointError;
use thiserror::Error;

/// Errors returned by path parsing, document writes, and edit sessions.
///
/// Reads and merges never fail; a malformed or unresolvable read path
/// yields `None`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The dot path could not be parsed.
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },
    /// A write tried to descend through a value that cannot hold the next step.
    #[error("cannot write {path}: cannot descend into {found} at {at}")]
    NotAContainer {
        path: String,
        at: String,
        found: &'static str,
    },
    /// A write addressed an index inside a sequence that does not exist.
    #[error("cannot write {path}: no sequence at {at}")]
    MissingSequence { path: String, at: String },
    /// A write addressed an index past the end of a sequence.
    #[error("cannot write {path}: index {index} out of bounds at {at} (len {len})")]
    IndexOutOfBounds {
        path: String,
        at: String,
        index: usize,
        len: usize,
    },
    /// Delete was requested for a document that was never saved.
    #[error("document {0} has no stored record")]
    NotPersisted(String),
    /// The persistence endpoint failed.
    #[error("endpoint error: {0}")]
    Endpoint(#[from] EndpointError),
}
