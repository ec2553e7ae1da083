//! File access and layer discovery for the loader.

use crate::ConfigError;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse one JSON5 file, naming the file in any error.
pub(super) fn read_json5(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json5(&contents, &path.display().to_string())
}

pub(super) fn parse_json5(contents: &str, layer: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::ParseFailed {
        layer: layer.to_string(),
        source,
    })
}

/// Working directory resolved through symlinks; a directory that does not
/// exist yet is used as given so it simply contributes no layers.
pub(super) fn resolve_cwd(cwd: &Path) -> Result<PathBuf, ConfigError> {
    match cwd.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(cwd.to_path_buf()),
        Err(source) => Err(ConfigError::ReadFailed {
            path: cwd.to_path_buf(),
            source,
        }),
    }
}

/// `folio.json5` in the nearest ancestor of `cwd` (inclusive) holding a marker.
pub(super) fn project_config_path(cwd: &Path, markers: &[String], file: &str) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(|root| root.join(file))
}

/// Files already queued, so the project root doubling as cwd loads once.
#[derive(Debug, Default)]
pub(super) struct SeenLayers {
    paths: HashSet<PathBuf>,
}

impl SeenLayers {
    /// True the first time a file (after resolving symlinks) is offered.
    pub(super) fn first_visit(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.paths.insert(key)
    }
}
