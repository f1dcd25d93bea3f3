//! Recording host for testing
//!
//! Wraps a [`MemoryHost`] and records every write the registrar issues, so
//! tests can assert on exactly what the host was asked to do.

use parking_lot::RwLock;

use crate::error::{Error, Result};

use super::memory::MemoryHost;
use super::traits::{RoleBackend, RoleStore};
use super::types::{Capabilities, HostRole};

/// Configuration for mock host behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Reject every `add_role` call
    pub fail_add: bool,
    /// Reject every `remove_role` call
    pub fail_remove: bool,
    /// Reject writes to this role only
    pub fail_role: Option<String>,
}

/// A host write, as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AddRole {
        name: String,
        display_name: String,
        capabilities: Capabilities,
    },
    RemoveRole {
        name: String,
    },
}

/// Recording implementation of [`RoleBackend`]
#[derive(Debug, Default)]
pub struct MockHost {
    config: MockConfig,
    store: MemoryHost,
    calls: RwLock<Vec<HostCall>>,
    lookups: RwLock<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Seed a role into the underlying store
    pub fn with_role(mut self, name: impl Into<String>, role: HostRole) -> Self {
        self.store.insert_role(name, role);
        self
    }

    pub fn store(&self) -> &MemoryHost {
        &self.store
    }

    /// All writes in the order they arrived
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.read().clone()
    }

    /// Get the number of times a method was called
    pub fn call_count(&self, method: &str) -> usize {
        let calls = self.calls.read();
        match method {
            "add_role" => calls.iter().filter(|c| matches!(c, HostCall::AddRole { .. })).count(),
            "remove_role" => calls.iter().filter(|c| matches!(c, HostCall::RemoveRole { .. })).count(),
            "get_role" => self.lookups.read().len(),
            _ => 0,
        }
    }

    /// Capabilities sent by the `add_role` calls for `name`
    pub fn added_capabilities(&self, name: &str) -> Vec<Capabilities> {
        self.calls
            .read()
            .iter()
            .filter_map(|call| match call {
                HostCall::AddRole { name: n, capabilities, .. } if n == name => {
                    Some(capabilities.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn reset_calls(&self) {
        self.calls.write().clear();
        self.lookups.write().clear();
    }

    fn rejects(&self, name: &str, all: bool) -> bool {
        all || self.config.fail_role.as_deref() == Some(name)
    }
}

impl RoleStore for MockHost {
    fn get_role(&self, name: &str) -> Option<HostRole> {
        self.lookups.write().push(name.to_string());
        self.store.get_role(name)
    }
}

impl RoleBackend for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn add_role(
        &mut self,
        name: &str,
        display_name: &str,
        capabilities: &Capabilities,
    ) -> Result<()> {
        self.calls.write().push(HostCall::AddRole {
            name: name.to_string(),
            display_name: display_name.to_string(),
            capabilities: capabilities.clone(),
        });

        if self.rejects(name, self.config.fail_add) {
            return Err(Error::store_rejected(name, "mock configured to fail add_role"));
        }
        self.store.add_role(name, display_name, capabilities)
    }

    fn remove_role(&mut self, name: &str) -> Result<()> {
        self.calls.write().push(HostCall::RemoveRole {
            name: name.to_string(),
        });

        if self.rejects(name, self.config.fail_remove) {
            return Err(Error::store_rejected(name, "mock configured to fail remove_role"));
        }
        self.store.remove_role(name)
    }
}
