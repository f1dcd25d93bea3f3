//! Common test utilities and fixtures

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// A temporary workspace holding a config file and a copy of the host role store
pub struct Workspace {
    pub root: TempDir,
    pub config_path: PathBuf,
    pub store_path: PathBuf,
}

impl Workspace {
    /// Workspace with the valid config fixture and the host roles fixture
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config_path = root.path().join("config.toml");
        let store_path = root.path().join("roles.json");

        fs::copy(fixture_path("valid_config.toml"), &config_path)
            .expect("Failed to copy config fixture");
        fs::copy(fixture_path("host_roles.json"), &store_path)
            .expect("Failed to copy store fixture");

        Self {
            root,
            config_path,
            store_path,
        }
    }

    pub fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).expect("Failed to write config");
    }

    pub fn config(&self) -> &str {
        path_str(&self.config_path)
    }

    pub fn store(&self) -> &str {
        path_str(&self.store_path)
    }

    /// Parsed host role document
    pub fn store_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(&self.store_path).expect("Failed to read store");
        serde_json::from_str(&content).expect("Store is not valid JSON")
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path is not UTF-8")
}

#[test]
fn test_fixtures_exist() {
    assert!(fixture_path("valid_config.toml").exists());
    assert!(fixture_path("invalid_config.toml").exists());
    assert!(fixture_path("host_roles.json").exists());
}
