//! Role and capability value types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Capability name to grant flag (`true` = granted, `false` = explicitly denied)
pub type Capabilities = BTreeMap<String, bool>;

/// A registered role: what to create, and which role to copy capabilities from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl RoleEntry {
    pub fn new(display_name: impl Into<String>, template: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            template,
        }
    }
}

/// A role as the host platform stores it.
///
/// Serialized field names follow the host's role option layout, where the
/// display name lives under `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRole {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl HostRole {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            capabilities: Capabilities::new(),
        }
    }

    /// Builder-style capability setter
    pub fn with_capability(mut self, capability: impl Into<String>, grant: bool) -> Self {
        self.capabilities.insert(capability.into(), grant);
        self
    }

    /// Whether the capability is defined on this role, granted or denied
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains_key(capability)
    }

    /// Merge capabilities in; incoming grant flags win
    pub fn merge(&mut self, capabilities: &Capabilities) {
        for (capability, grant) in capabilities {
            self.capabilities.insert(capability.clone(), *grant);
        }
    }
}

/// What `add` will send to the host for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleChange {
    pub role: String,
    pub display_name: String,
    pub template: Option<String>,
    /// Whether the role already existed in the host when planned
    pub exists: bool,
    /// Capabilities passed to the host `add_role` call
    pub capabilities: Capabilities,
    /// Template capabilities dropped because the role already defines them
    pub pruned: Vec<String>,
}

impl RoleChange {
    pub fn is_noop(&self) -> bool {
        self.exists && self.capabilities.is_empty()
    }
}

/// A role declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}
