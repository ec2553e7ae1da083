//! Argument parsing and output helpers for the CLI.

use anyhow::{Context, anyhow};
use folio_rs::core::{ContentDefinition, Path};
use folio_rs::protocol::BinaryFile;
use serde_json::Value;
use std::fs;

/// One line per definition for `folio list`.
pub(crate) fn describe(definition: &ContentDefinition) -> String {
    let mut line = format!(
        "{:<12} {:<28} {}/{}",
        definition.name,
        definition.api_path,
        definition.kind.record_type,
        definition.kind.subtype
    );
    let fallbacks = definition.policy.overridden_paths();
    if !fallbacks.is_empty() {
        line.push_str(&format!(
            "  keeps defaults when empty: {}",
            fallbacks.join(", ")
        ));
    }
    line
}

/// `PATH=VALUE`, where VALUE is JSON if it parses and plain text otherwise.
pub(crate) fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PATH=VALUE, got {raw:?}"))?;
    Path::parse(path)?;
    Ok((path.to_string(), parse_value(value)))
}

pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `PATH=FILE` read into memory with a content type guessed from the extension.
pub(crate) fn read_attachment(raw: &str) -> anyhow::Result<(String, BinaryFile)> {
    let (path, file) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PATH=FILE, got {raw:?}"))?;
    Path::parse(path)?;
    let file_path = std::path::Path::new(file);
    let bytes = fs::read(file_path).with_context(|| format!("failed to read {file}"))?;
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    let content_type = content_type_for(&file_name);
    Ok((
        path.to_string(),
        BinaryFile::new(file_name, content_type, bytes),
    ))
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Whole document, or the value at `path`.
pub(crate) fn select<'a>(document: &'a Value, path: Option<&str>) -> anyhow::Result<&'a Value> {
    let Some(path) = path else {
        return Ok(document);
    };
    let parsed = Path::parse(path)?;
    folio_rs::core::get_at_path(document, &parsed).ok_or_else(|| anyhow!("no value at {path}"))
}

pub(crate) fn render(value: &Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
