//! folio configuration.
//!
//! `folio.json5` files carry the endpoint settings and any document
//! definitions beyond the built-ins. Files are discovered in layers (user,
//! project, working directory, then explicit paths), schema-checked one by
//! one, merged, and decoded into [`FolioConfig`].

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::{
    AttachmentNamingConfig, DocumentConfig, EndpointConfig, FolioConfig, FolioConfigBuilder,
};
