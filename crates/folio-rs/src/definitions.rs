//! Turns configured documents into content definitions.

use folio_rs_config::{AttachmentNamingConfig, ConfigError, DocumentConfig, FolioConfig};
use folio_rs_core::catalog::{self, ContentDefinition};
use folio_rs_core::{AttachmentNaming, Document};
use folio_rs_protocol::ContentKind;
use log::debug;

/// Built-in definitions with configured overrides applied, followed by any
/// additional documents in config order.
pub fn resolve_definitions(config: &FolioConfig) -> Result<Vec<ContentDefinition>, ConfigError> {
    let mut definitions = catalog::builtins();
    for entry in &config.documents {
        let resolved = definition_from_config(entry)?;
        match definitions
            .iter_mut()
            .find(|definition| definition.name == resolved.name)
        {
            Some(slot) => *slot = resolved,
            None => definitions.push(resolved),
        }
    }
    debug!("resolved content definitions (count={})", definitions.len());
    Ok(definitions)
}

/// Build one definition. Entries named after a built-in start from it;
/// anything else must spell out every field.
pub fn definition_from_config(entry: &DocumentConfig) -> Result<ContentDefinition, ConfigError> {
    let base = catalog::builtin(&entry.name);
    let missing = |field: &str| ConfigError::InvalidField {
        path: format!("documents.{}.{field}", entry.name),
        message: "required for documents without a built-in definition".to_string(),
    };

    let api_path = match (&entry.api_path, &base) {
        (Some(api_path), _) => api_path.clone(),
        (None, Some(base)) => base.api_path.clone(),
        (None, None) => return Err(missing("api_path")),
    };
    let record_type = match (&entry.record_type, &base) {
        (Some(record_type), _) => record_type.clone(),
        (None, Some(base)) => base.kind.record_type.clone(),
        (None, None) => return Err(missing("type")),
    };
    let subtype = match (&entry.subtype, &base) {
        (Some(subtype), _) => subtype.clone(),
        (None, Some(base)) => base.kind.subtype.clone(),
        (None, None) => return Err(missing("subtype")),
    };
    let default_shape = match (&entry.defaults, &base) {
        (Some(defaults), _) => Document::new(defaults.clone()),
        (None, Some(base)) => base.default_shape.clone(),
        (None, None) => return Err(missing("defaults")),
    };

    let mut policy = base
        .as_ref()
        .map(|base| base.policy.clone())
        .unwrap_or_default();
    for path in &entry.array_fallback {
        policy = policy.fallback_when_empty(path.clone());
    }
    let naming = match entry.attachment_naming {
        Some(AttachmentNamingConfig::Path) => AttachmentNaming::PathPrefixed,
        Some(AttachmentNamingConfig::Indexed) => AttachmentNaming::IndexedField,
        None => base.as_ref().map(|base| base.naming).unwrap_or_default(),
    };

    Ok(ContentDefinition::new(
        entry.name.clone(),
        api_path,
        ContentKind::new(record_type, subtype),
        default_shape,
    )
    .with_policy(policy)
    .with_naming(naming))
}
