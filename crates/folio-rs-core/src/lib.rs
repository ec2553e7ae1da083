//! Path-addressed content documents.
//!
//! This crate owns the document model used by page editors: merging stored
//! documents with their default shape, reading and writing fields by dot
//! path, staging attachments, and the edit session lifecycle around a
//! persistence endpoint.

pub mod attachments;
pub mod catalog;
pub mod document;
pub mod error;
pub mod merge;
pub mod path;
pub mod session;

/// Attachment staging and multipart naming.
pub use attachments::{AttachmentNaming, AttachmentRegistry};
/// Content definitions and the built-in catalog.
pub use catalog::ContentDefinition;
/// Document type and raw path operations.
pub use document::{Document, get_at_path, set_at_path};
/// Core error type.
pub use error::CoreError;
/// Default merging.
pub use merge::{ArrayRule, MergePolicy, merge_with_default};
/// Parsed paths.
pub use path::{Path, PathStep};
/// Edit session lifecycle.
pub use session::EditSession;
