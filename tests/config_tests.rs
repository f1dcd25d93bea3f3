//! Configuration system tests
//!
//! Tests configuration loading and validation through the public API

mod common;

use role_registrar::config::RegistrarConfig;
use role_registrar::roles::HostKind;
use role_registrar::{Error, ErrorCode};

use common::{fixture_path, fixtures_dir, Workspace};

#[test]
fn test_load_valid_fixture() {
    let path = fixture_path("valid_config.toml");
    let config = RegistrarConfig::load(path.to_str()).unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.store.kind, HostKind::Json);

    let names: Vec<&str> = config.roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["seo_manager", "seo_editor", "reviewer"]);
    assert_eq!(config.roles[2].template, None);
}

#[test]
fn test_relative_store_path_follows_config_file() {
    let path = fixture_path("valid_config.toml");
    let config = RegistrarConfig::load(path.to_str()).unwrap();

    assert_eq!(
        config.store.path,
        fixtures_dir().join("roles.json").to_string_lossy()
    );
}

#[test]
fn test_duplicate_declarations_are_reported() {
    let ws = Workspace::new();
    ws.write_config(
        r#"
[[roles]]
name = "dup"
display_name = "First"

[[roles]]
name = "dup"
display_name = "Second"
"#,
    );

    let config = RegistrarConfig::load(Some(ws.config())).unwrap();
    assert_eq!(config.roles.len(), 2);
    assert_eq!(config.duplicate_roles(), ["dup"]);
}

#[test]
fn test_load_invalid_fixture() {
    let path = fixture_path("invalid_config.toml");
    let err = RegistrarConfig::load(path.to_str()).unwrap_err();

    assert_eq!(err.code(), ErrorCode::ConfigValidation);
    assert!(matches!(
        err,
        Error::ConfigValidation { field: Some(ref f), .. } if f == "roles[0].display_name"
    ));
}

#[test]
fn test_minimal_config_uses_defaults() {
    let ws = Workspace::new();
    ws.write_config("[logging]\nlevel = \"error\"\n");

    let config = RegistrarConfig::load(Some(ws.config())).unwrap();
    assert!(config.roles.is_empty());
    assert_eq!(config.store.kind, HostKind::Json);
    assert!(config.store.path.ends_with("roles.json"));
}

#[test]
fn test_malformed_toml() {
    let ws = Workspace::new();
    ws.write_config("[[roles]\nname = ");

    let err = RegistrarConfig::load(Some(ws.config())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigParseError);
    assert!(err.suggestion().unwrap().contains("config validate"));
}

#[test]
fn test_memory_store_config() {
    let ws = Workspace::new();
    ws.write_config(
        r#"
[store]
kind = "memory"

[[roles]]
name = "reviewer"
display_name = "Reviewer"
"#,
    );

    let config = RegistrarConfig::load(Some(ws.config())).unwrap();
    assert_eq!(config.store.kind, HostKind::Memory);
    assert_eq!(config.roles.len(), 1);
}

#[test]
fn test_role_missing_display_name_is_parse_error() {
    let ws = Workspace::new();
    ws.write_config("[[roles]]\nname = \"reviewer\"\n");

    let err = RegistrarConfig::load(Some(ws.config())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigParseError);
}
