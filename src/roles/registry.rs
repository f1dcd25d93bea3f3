//! Host adapter selection
//!
//! Maps the configured store kind to a concrete [`RoleBackend`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StoreSettings;
use crate::error::{Error, Result};

use super::{JsonFileHost, MemoryHost, RoleBackend};

/// Supported host adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Role store kept in a JSON document on disk
    Json,
    /// Throwaway in-memory store
    Memory,
}

impl HostKind {
    pub fn all() -> &'static [HostKind] {
        &[HostKind::Json, HostKind::Memory]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostKind::Json => "json",
            HostKind::Memory => "memory",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HostKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(HostKind::Json),
            "memory" => Ok(HostKind::Memory),
            _ => Err(Error::UnknownStoreKind { kind: s.to_string() }),
        }
    }
}

/// Open the host role store described by `settings`
pub fn open_host(settings: &StoreSettings) -> Result<Box<dyn RoleBackend>> {
    let host: Box<dyn RoleBackend> = match settings.kind {
        HostKind::Json => Box::new(JsonFileHost::open(&settings.path)?),
        HostKind::Memory => Box::new(MemoryHost::new()),
    };

    info!(store = %settings.kind, path = %settings.path, "Role store opened");
    Ok(host)
}
