//! Host platform seams
//!
//! Role data lives entirely in the host platform. The registrar reads it
//! through [`RoleStore`] and writes through [`RoleBackend`], so production
//! adapters and test doubles are interchangeable.

use crate::error::Result;

use super::types::{Capabilities, HostRole};

/// Read access to the host's role store.
pub trait RoleStore {
    /// Look up a role by name. `None` when the host does not know it.
    fn get_role(&self, name: &str) -> Option<HostRole>;

    /// Capabilities of a role, empty when the role is unknown
    fn capabilities_of(&self, name: &str) -> Capabilities {
        self.get_role(name)
            .map(|role| role.capabilities)
            .unwrap_or_default()
    }
}

/// Write access to the host's role store.
///
/// Implementations decide the merge policy when `add_role` targets an
/// existing role. Deleting an unknown role must be a no-op.
pub trait RoleBackend: RoleStore {
    /// Short name of the adapter, used in logs
    fn name(&self) -> &'static str;

    /// Create the role, or merge capabilities into it if it already exists
    fn add_role(
        &mut self,
        name: &str,
        display_name: &str,
        capabilities: &Capabilities,
    ) -> Result<()>;

    /// Delete the role
    fn remove_role(&mut self, name: &str) -> Result<()>;
}

impl<T: RoleStore + ?Sized> RoleStore for Box<T> {
    fn get_role(&self, name: &str) -> Option<HostRole> {
        (**self).get_role(name)
    }
}

impl<T: RoleBackend + ?Sized> RoleBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn add_role(
        &mut self,
        name: &str,
        display_name: &str,
        capabilities: &Capabilities,
    ) -> Result<()> {
        (**self).add_role(name, display_name, capabilities)
    }

    fn remove_role(&mut self, name: &str) -> Result<()> {
        (**self).remove_role(name)
    }
}
