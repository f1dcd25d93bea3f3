//! Error types for role-registrar
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly suggestions
//! - Exit codes for CLI
//!
//! The registrar itself never fails: unknown templates resolve to an empty
//! capability set. Errors come from configuration, IO and host adapters.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for registrar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Host store errors (3xx)
    StoreCorrupted = 300,
    StoreRejected = 301,
    StoreUnknownKind = 302,
    RoleNotFound = 310,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Host Store Errors
    // ─────────────────────────────────────────────────────────────

    /// Host role document could not be decoded
    #[error("Role store {path} is corrupted: {message}")]
    StoreCorrupted { path: PathBuf, message: String },

    /// Host refused a role write
    #[error("Host rejected change to role '{role}': {message}")]
    StoreRejected { role: String, message: String },

    /// Unknown host store kind in configuration or CLI
    #[error("Unknown role store kind '{kind}'")]
    UnknownStoreKind { kind: String },

    /// Role does not exist in the host
    #[error("Role not found in host: {role}")]
    RoleNotFound { role: String },
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } | Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::StoreCorrupted,

            Error::StoreCorrupted { .. } => ErrorCode::StoreCorrupted,
            Error::StoreRejected { .. } => ErrorCode::StoreRejected,
            Error::UnknownStoreKind { .. } => ErrorCode::StoreUnknownKind,
            Error::RoleNotFound { .. } => ErrorCode::RoleNotFound,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'role-registrar config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'role-registrar config validate' to see details."
            ),
            Error::ConfigValidation { .. } | Error::Config(_) => Some(
                "Every [[roles]] entry needs a non-empty name and display_name, and may not use itself as template."
            ),
            Error::StoreCorrupted { .. } | Error::Json(_) => Some(
                "The role store must be a JSON object mapping role names to {\"name\", \"capabilities\"}."
            ),
            Error::StoreRejected { .. } => Some(
                "Check that the host allows role changes for this account."
            ),
            Error::UnknownStoreKind { .. } => Some(
                "Valid store kinds are 'json' and 'memory'."
            ),
            Error::RoleNotFound { .. } => Some(
                "Run 'role-registrar add' first, or check the role name."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(message: impl Into<String>, source: toml::de::Error) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn store_rejected(role: impl Into<String>, message: impl Into<String>) -> Self {
        Error::StoreRejected {
            role: role.into(),
            message: message.into(),
        }
    }

    pub fn store_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::StoreCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }
}
