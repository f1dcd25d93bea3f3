//! Host role store backed by a JSON document
//!
//! The document mirrors the host's serialized role option:
//!
//! ```json
//! {
//!   "editor": { "name": "Editor", "capabilities": { "edit_posts": true } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::memory::MemoryHost;
use super::traits::{RoleBackend, RoleStore};
use super::types::{Capabilities, HostRole};

/// Role store persisted as JSON. Every successful write is saved immediately,
/// and a write whose save fails is rolled back in memory as well.
#[derive(Debug)]
pub struct JsonFileHost {
    path: PathBuf,
    inner: MemoryHost,
}

impl JsonFileHost {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            let roles = parse_roles(&path, &content)?;
            debug!(path = %path.display(), roles = roles.len(), "Loaded role store");
            MemoryHost::from_roles(roles)
        } else {
            debug!(path = %path.display(), "Role store does not exist yet, starting empty");
            MemoryHost::new()
        };

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn roles(&self) -> &BTreeMap<String, HostRole> {
        self.inner.roles()
    }

    /// Write the store to disk via a temp file and rename
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self.inner.roles())?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json).map_err(|e| Error::IoWrite {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::IoWrite {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), roles = self.inner.len(), "Saved role store");
        Ok(())
    }

    fn save_or_restore(&mut self, snapshot: MemoryHost) -> Result<()> {
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "Save failed, discarding change");
            self.inner = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

fn parse_roles(path: &Path, content: &str) -> Result<BTreeMap<String, HostRole>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(content).map_err(|e| Error::store_corrupted(path, e.to_string()))
}

impl RoleStore for JsonFileHost {
    fn get_role(&self, name: &str) -> Option<HostRole> {
        self.inner.get_role(name)
    }
}

impl RoleBackend for JsonFileHost {
    fn name(&self) -> &'static str {
        "json"
    }

    fn add_role(
        &mut self,
        name: &str,
        display_name: &str,
        capabilities: &Capabilities,
    ) -> Result<()> {
        let snapshot = self.inner.clone();
        self.inner.add_role(name, display_name, capabilities)?;
        self.save_or_restore(snapshot)
    }

    fn remove_role(&mut self, name: &str) -> Result<()> {
        if self.inner.get_role(name).is_none() {
            return Ok(());
        }
        let snapshot = self.inner.clone();
        self.inner.remove_role(name)?;
        self.save_or_restore(snapshot)?;
        info!(role = %name, path = %self.path.display(), "Role deleted from store");
        Ok(())
    }
}
