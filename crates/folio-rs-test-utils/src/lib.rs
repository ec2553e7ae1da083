//! Test helpers shared across Folio crates.

pub mod endpoint;

pub use endpoint::{EndpointCall, FailingEndpoint, MemoryEndpoint};
