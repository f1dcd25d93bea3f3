//! In-memory host role store

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;

use super::traits::{RoleBackend, RoleStore};
use super::types::{Capabilities, HostRole};

/// Host role store held in memory.
///
/// `add_role` on an unknown role creates it; on an existing role it merges
/// capabilities one by one and keeps the existing display name.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    roles: BTreeMap<String, HostRole>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a host from existing roles
    pub fn from_roles(roles: BTreeMap<String, HostRole>) -> Self {
        Self { roles }
    }

    /// Builder-style seeding, for fixtures
    pub fn with_role(mut self, name: impl Into<String>, role: HostRole) -> Self {
        self.insert_role(name, role);
        self
    }

    /// Insert or replace a role without merge semantics
    pub fn insert_role(&mut self, name: impl Into<String>, role: HostRole) {
        self.roles.insert(name.into(), role);
    }

    pub fn roles(&self) -> &BTreeMap<String, HostRole> {
        &self.roles
    }

    pub fn into_roles(self) -> BTreeMap<String, HostRole> {
        self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl RoleStore for MemoryHost {
    fn get_role(&self, name: &str) -> Option<HostRole> {
        self.roles.get(name).cloned()
    }
}

impl RoleBackend for MemoryHost {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn add_role(
        &mut self,
        name: &str,
        display_name: &str,
        capabilities: &Capabilities,
    ) -> Result<()> {
        match self.roles.get_mut(name) {
            Some(existing) => {
                existing.merge(capabilities);
                debug!(role = %name, merged = capabilities.len(), "Merged capabilities into existing role");
            }
            None => {
                self.roles.insert(
                    name.to_string(),
                    HostRole {
                        display_name: display_name.to_string(),
                        capabilities: capabilities.clone(),
                    },
                );
                debug!(role = %name, capabilities = capabilities.len(), "Created role");
            }
        }
        Ok(())
    }

    fn remove_role(&mut self, name: &str) -> Result<()> {
        if self.roles.remove(name).is_some() {
            debug!(role = %name, "Removed role");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(pairs: &[(&str, bool)]) -> Capabilities {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_add_creates_role() {
        let mut host = MemoryHost::new();
        host.add_role("seo_editor", "SEO Editor", &caps(&[("read", true)]))
            .unwrap();

        let role = host.get_role("seo_editor").unwrap();
        assert_eq!(role.display_name, "SEO Editor");
        assert_eq!(role.capabilities, caps(&[("read", true)]));
    }

    #[test]
    fn test_add_merges_into_existing_role() {
        let mut host = MemoryHost::new().with_role(
            "seo_editor",
            HostRole::new("Old Name").with_capability("read", true),
        );

        host.add_role("seo_editor", "SEO Editor", &caps(&[("edit_posts", true)]))
            .unwrap();

        let role = host.get_role("seo_editor").unwrap();
        assert_eq!(role.display_name, "Old Name");
        assert_eq!(role.capabilities, caps(&[("edit_posts", true), ("read", true)]));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut host = MemoryHost::new();
        assert!(host.remove_role("ghost").is_ok());
        assert!(host.is_empty());
    }

    #[test]
    fn test_capabilities_of_unknown_role_is_empty() {
        let host = MemoryHost::new();
        assert!(host.capabilities_of("editor").is_empty());
    }
}
