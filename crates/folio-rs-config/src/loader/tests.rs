//! Tests for layered configuration loading.

use super::*;
use crate::{AttachmentNamingConfig, DocumentConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Temp tree with `project/.git` and `project/site` as the working directory.
fn project_tree() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("site");
    fs::create_dir_all(&cwd).expect("cwd");
    (temp, project_root, cwd)
}

#[test]
fn parse_minimal_config() {
    let config = FolioConfig::load_from_str("{}").expect("config");
    assert_eq!(config.endpoint.base_url, "http://localhost:3000");
    assert_eq!(config.endpoint.timeout_secs, 30);
    assert_eq!(config.endpoint.token, None);
    assert!(config.documents.is_empty());
}

#[test]
fn parses_document_entries() {
    let json5 = r#"{
        // custom block next to the built-ins
        documents: [
            {
                name: "promo",
                api_path: "/api/content/promo",
                type: "home",
                subtype: "promo",
                array_fallback: ["items"],
                attachment_naming: "indexed",
                defaults: { title: "Promo", items: [{ label: "" }] },
            },
        ],
    }"#;
    let config = FolioConfig::load_from_str(json5).expect("config");
    let promo = config.document("promo").expect("promo");

    assert_eq!(promo.record_type.as_deref(), Some("home"));
    assert_eq!(promo.array_fallback, vec!["items".to_string()]);
    assert_eq!(
        promo.attachment_naming,
        Some(AttachmentNamingConfig::Indexed)
    );
    assert_eq!(
        promo.defaults,
        Some(json!({ "title": "Promo", "items": [{ "label": "" }] }))
    );
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = FolioConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_document_without_name() {
    let err = FolioConfig::load_from_str(r#"{ documents: [{ api_path: "/x" }] }"#).unwrap_err();
    match err {
        ConfigError::InvalidField { path, message } => {
            assert_eq!(path, "config:documents[0].name");
            assert_eq!(message, "required");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_object_defaults() {
    let json5 = r#"{ documents: [{ name: "hero", defaults: [1, 2] }] }"#;
    let err = FolioConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("documents[0].defaults"));
}

#[test]
fn rejects_unknown_attachment_naming() {
    let json5 = r#"{ documents: [{ name: "hero", attachment_naming: "random" }] }"#;
    let err = FolioConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("attachment_naming"));
}

#[test]
fn rejects_duplicate_document_names() {
    let json5 = r#"{ documents: [{ name: "hero" }, { name: "hero" }] }"#;
    let err = FolioConfig::load_from_str(json5).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("duplicate")));
}

#[test]
fn rejects_empty_api_path() {
    let json5 = r#"{ documents: [{ name: "hero", api_path: " " }] }"#;
    let err = FolioConfig::load_from_str(json5).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("api_path")));
}

#[test]
fn rejects_zero_timeout() {
    let err = FolioConfig::load_from_str("{ endpoint: { timeout_secs: 0 } }").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn load_from_path_reports_missing_file() {
    let temp = TempDir::new().expect("tmp");
    let missing = temp.path().join("absent.json5");
    let err = FolioConfig::load_from_path(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed { ref path, .. } if *path == missing));
}

#[test]
fn layered_config_prefers_cwd_over_project_and_user() {
    let (temp, project_root, cwd) = project_tree();

    let user_config = temp.path().join("user.json5");
    write_json5(
        &user_config,
        r#"{ endpoint: { base_url: "https://user.example", token: "user-token" } }"#,
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ endpoint: { base_url: "https://project.example" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ endpoint: { base_url: "https://cwd.example" } }"#,
    );

    let options = LayeredConfigOptions::new(&cwd).with_user_path(Some(user_config));
    let layered = FolioConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.endpoint.base_url, "https://cwd.example");
    assert_eq!(layered.config.endpoint.token.as_deref(), Some("user-token"));
    let sources: Vec<ConfigLayerSource> =
        layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
        ]
    );
}

#[test]
fn project_root_is_not_loaded_twice() {
    let (_temp, project_root, _cwd) = project_tree();
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ documents: [{ name: "hero", array_fallback: ["cards"] }] }"#,
    );

    let options = LayeredConfigOptions::new(&project_root).with_user_path(None);
    let layered = FolioConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
    assert_eq!(layered.config.documents.len(), 1);
}

#[test]
fn runtime_override_wins() {
    let (temp, project_root, cwd) = project_tree();
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ endpoint: { base_url: "https://project.example", timeout_secs: 10 } }"#,
    );
    let runtime_config = temp.path().join("runtime.json5");
    write_json5(
        &runtime_config,
        r#"{ endpoint: { base_url: "https://runtime.example" } }"#,
    );

    let options = LayeredConfigOptions::new(&cwd)
        .with_user_path(None)
        .with_runtime_path(&runtime_config);
    let layered = FolioConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.endpoint.base_url, "https://runtime.example");
    assert_eq!(layered.config.endpoint.timeout_secs, 10);
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Runtime)
    );
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let (temp, _project_root, cwd) = project_tree();
    let options = LayeredConfigOptions::new(&cwd)
        .with_user_path(None)
        .with_runtime_path(temp.path().join("missing.json5"));

    let err = FolioConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed { .. }));
}

#[test]
fn document_entries_merge_across_layers() {
    let (_temp, project_root, cwd) = project_tree();
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{
            documents: [
                { name: "promo", api_path: "/api/promo", type: "home", subtype: "promo",
                  defaults: { title: "Promo", body: "" } },
            ],
        }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ documents: [{ name: "promo", defaults: { title: "Local promo" } }] }"#,
    );

    let options = LayeredConfigOptions::new(&cwd).with_user_path(None);
    let layered = FolioConfig::load_layered_with_options(options).expect("layered");
    let promo = layered.config.document("promo").expect("promo");

    assert_eq!(promo.api_path.as_deref(), Some("/api/promo"));
    assert_eq!(
        promo.defaults,
        Some(json!({ "title": "Local promo", "body": "" }))
    );
}

#[test]
fn schema_errors_name_the_layer() {
    let (_temp, _project_root, cwd) = project_tree();
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ endpoint: { timeout_secs: "soon" } }"#,
    );

    let options = LayeredConfigOptions::new(&cwd).with_user_path(None);
    let err = FolioConfig::load_layered_with_options(options).unwrap_err();

    match err {
        ConfigError::InvalidField { path, .. } => {
            assert!(path.starts_with("cwd("), "{path}");
            assert!(path.ends_with(":endpoint.timeout_secs"), "{path}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn builder_sets_endpoint_and_documents() {
    let config = FolioConfig::builder()
        .base_url("https://cms.example")
        .document(DocumentConfig::named("hero"))
        .build();

    assert_eq!(config.endpoint.base_url, "https://cms.example");
    assert!(config.validate().is_ok());
    assert!(config.document("hero").is_some());
}

#[test]
fn parse_errors_name_the_file() {
    let (_temp, _project_root, cwd) = project_tree();
    let broken = cwd.join(DEFAULT_CONFIG_FILE);
    write_json5(&broken, "{ endpoint: ");

    let options = LayeredConfigOptions::new(&cwd).with_user_path(None);
    let err = FolioConfig::load_layered_with_options(options).unwrap_err();
    match err {
        ConfigError::ParseFailed { layer, .. } => {
            assert!(layer.ends_with(DEFAULT_CONFIG_FILE), "layer was {layer}");
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn missing_cwd_contributes_no_layers() {
    let temp = TempDir::new().expect("tmp");
    let options = LayeredConfigOptions::new(temp.path().join("not-yet")).with_user_path(None);
    let layered = FolioConfig::load_layered_with_options(options).expect("layered");
    assert!(layered.layers.is_empty());
}
