//! Pending binary uploads keyed by document path.

use crate::error::CoreError;
use crate::path::Path;
use folio_rs_protocol::{AttachmentPart, BinaryFile};
use log::debug;
use std::collections::BTreeMap;

/// How an attachment's multipart field name is derived from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentNaming {
    /// `file:<path>`, e.g. `file:general.logo`.
    #[default]
    PathPrefixed,
    /// `<sequence>Image<index>`, e.g. `servicesImage2` for `home.services.2.image`.
    /// Paths without an index fall back to `file:<path>`.
    IndexedField,
}

impl AttachmentNaming {
    /// Multipart field name for an attachment at `path`.
    pub fn part_name(self, path: &str) -> String {
        let path_prefixed = format!("file:{path}");
        match self {
            AttachmentNaming::PathPrefixed => path_prefixed,
            AttachmentNaming::IndexedField => {
                let Ok(parsed) = Path::parse(path) else {
                    return path_prefixed;
                };
                match parsed.indexed_field() {
                    Some((field, index)) => format!("{field}Image{index}"),
                    None => path_prefixed,
                }
            }
        }
    }
}

/// Binaries staged for the next submit, kept out of the JSON document.
///
/// `None` entries record that the stored binary should be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentRegistry {
    entries: BTreeMap<String, Option<BinaryFile>>,
}

impl AttachmentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `file` for `path`, or stage a removal when `file` is `None`.
    ///
    /// `path` must parse as a field path; nothing is staged otherwise.
    pub fn set(&mut self, path: &str, file: Option<BinaryFile>) -> Result<(), CoreError> {
        let path = Path::parse(path)?.to_string();
        match &file {
            Some(file) => debug!(
                "staged attachment (path={}, file={}, bytes={})",
                path,
                file.file_name,
                file.bytes.len()
            ),
            None => debug!("staged attachment removal (path={path})"),
        }
        self.entries.insert(path, file);
        Ok(())
    }

    /// Staged entry for `path`; the inner `None` is a staged removal.
    pub fn get(&self, path: &str) -> Option<&Option<BinaryFile>> {
        self.entries.get(path)
    }

    /// Drop the staged entry for `path` without recording a removal.
    pub fn discard(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every staged entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Staged entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&BinaryFile>)> {
        self.entries
            .iter()
            .map(|(path, file)| (path.as_str(), file.as_ref()))
    }

    /// Multipart entries for the staged attachments.
    pub fn to_parts(&self, naming: AttachmentNaming) -> Vec<AttachmentPart> {
        self.entries
            .iter()
            .map(|(path, file)| AttachmentPart {
                name: naming.part_name(path),
                path: path.clone(),
                file: file.clone(),
            })
            .collect()
    }
}
