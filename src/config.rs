//! Configuration system for role-registrar
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (ROLE_REGISTRAR_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::roles::{HostKind, RoleDefinition};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Logging configuration
    pub logging: LoggingSettings,

    /// Host role store
    pub store: StoreSettings,

    /// Roles to register, in order
    pub roles: Vec<RoleDefinition>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (unset = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Host role store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store kind: json or memory
    pub kind: HostKind,

    /// Path of the JSON role document (json kind only)
    pub path: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: HostKind::Json,
            path: "~/.role-registrar/roles.json".to_string(),
        }
    }
}

impl RegistrarConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = Self::parse(&content)?;
            if let Some(dir) = path.parent() {
                config.resolve_relative_paths(dir);
            }
            info!(path = %path.display(), roles = config.roles.len(), "Configuration loaded from file");
        }

        config.apply_env_overrides()?;
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_parse(e.message().to_string(), e))
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            Some(PathBuf::from("role-registrar.toml")),
            dirs::config_dir().map(|p| p.join("role-registrar").join("config.toml")),
            dirs::home_dir().map(|p| p.join(".role-registrar").join("config.toml")),
            Some(PathBuf::from("/etc/role-registrar/config.toml")),
        ];

        for path in search_paths.into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ROLE_REGISTRAR_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("ROLE_REGISTRAR_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("ROLE_REGISTRAR_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("ROLE_REGISTRAR_STORE_KIND") {
            self.store.kind = val.parse().map_err(|e: Error| {
                Error::config_field_invalid("ROLE_REGISTRAR_STORE_KIND", e.to_string())
            })?;
        }
        if let Ok(val) = std::env::var("ROLE_REGISTRAR_STORE_PATH") {
            self.store.path = val;
        }

        Ok(())
    }

    /// Resolve relative file paths against the directory of the config file
    fn resolve_relative_paths(&mut self, dir: &Path) {
        self.store.path = resolve_path(dir, &self.store.path);
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(resolve_path(dir, file));
        }
    }

    /// Override the store path from the command line
    pub fn with_store_path(mut self, path: Option<&str>) -> Self {
        if let Some(path) = path {
            self.store.path = expand_path(path);
        }
        self
    }

    /// Expand ~ and environment variables in paths
    fn expand_paths(&mut self) {
        self.store.path = expand_path(&self.store.path);
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.store.kind == HostKind::Json && self.store.path.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "store.path",
                "store.path is required for the json store",
            ));
        }

        for (index, role) in self.roles.iter().enumerate() {
            if role.name.trim().is_empty() {
                return Err(Error::config_field_invalid(
                    format!("roles[{}].name", index),
                    "Role name cannot be empty",
                ));
            }
            if role.display_name.trim().is_empty() {
                return Err(Error::config_field_invalid(
                    format!("roles[{}].display_name", index),
                    format!("Role '{}' needs a display name", role.name),
                ));
            }
            if role.template.as_deref() == Some(role.name.as_str()) {
                return Err(Error::config_field_invalid(
                    format!("roles[{}].template", index),
                    format!("Role '{}' cannot use itself as template", role.name),
                ));
            }
        }

        Ok(())
    }

    /// Role names declared more than once, in order of their first repeat
    pub fn duplicate_roles(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for role in &self.roles {
            let name = role.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Expand `path`, then anchor it at `dir` if it is still relative
fn resolve_path(dir: &Path, path: &str) -> String {
    let expanded = expand_path(path);
    if Path::new(&expanded).is_relative() {
        dir.join(&expanded).to_string_lossy().into_owned()
    } else {
        expanded
    }
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".role-registrar")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# role-registrar configuration

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.role-registrar/logs/registrar.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[store]
# Host role store: "json" (document on disk) or "memory"
kind = "json"

# Role document, keyed by role name:
# { "editor": { "name": "Editor", "capabilities": { "edit_posts": true } } }
path = "~/.role-registrar/roles.json"

# Roles are added and removed in the order they are declared.
# A role copies every capability of its template that it does not define yet.

[[roles]]
name = "seo_manager"
display_name = "SEO Manager"
template = "editor"

[[roles]]
name = "seo_editor"
display_name = "SEO Editor"
template = "editor"
"#
    .to_string()
}
