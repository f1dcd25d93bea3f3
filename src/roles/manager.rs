//! Role manager — register roles, then apply or remove them against the host.
//!
//! Registration is declarative: nothing touches the host until [`RoleManager::add`]
//! or [`RoleManager::remove`] runs. Roles are processed in registration order.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::Result;

use super::traits::{RoleBackend, RoleStore};
use super::types::{Capabilities, HostRole, RoleChange, RoleDefinition, RoleEntry};

// ─────────────────────────────────────────────────────────────────
// Role Manager
// ─────────────────────────────────────────────────────────────────

/// Registers roles and synchronizes them with a host backend.
pub struct RoleManager<B: RoleBackend> {
    backend: B,
    roles: IndexMap<String, RoleEntry>,
}

impl<B: RoleBackend> RoleManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            roles: IndexMap::new(),
        }
    }

    /// Register a role, optionally based on a template role.
    ///
    /// Re-registering a name replaces its display name and template but keeps
    /// its original position.
    pub fn register(
        &mut self,
        role: impl Into<String>,
        display_name: impl Into<String>,
        template: Option<&str>,
    ) {
        let role = role.into();
        let entry = RoleEntry::new(display_name, template.map(str::to_string));
        debug!(role = %role, template = ?entry.template, "Role registered");
        self.roles.insert(role, entry);
    }

    /// Register every definition, in order
    pub fn register_all<'a>(&mut self, definitions: impl IntoIterator<Item = &'a RoleDefinition>) {
        for def in definitions {
            self.register(def.name.as_str(), def.display_name.as_str(), def.template.as_deref());
        }
    }

    /// Registered role names, in registration order
    pub fn get_roles(&self) -> Vec<String> {
        self.roles.keys().cloned().collect()
    }

    pub fn entry(&self, role: &str) -> Option<&RoleEntry> {
        self.roles.get(role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // ─────────────────────────────────────────────────────────────
    // Plan / Apply
    // ─────────────────────────────────────────────────────────────

    /// Compute what [`add`](Self::add) would send to the host, without writing.
    ///
    /// Each change is projected onto an overlay of the store before the next
    /// role is planned, so a role may use an earlier one as its template.
    pub fn plan(&self) -> Vec<RoleChange> {
        let mut projection = Projection::new(&self.backend);
        self.roles
            .iter()
            .map(|(role, entry)| {
                let change = plan_role(&projection, role, entry);
                projection.apply(&change);
                change
            })
            .collect()
    }

    /// Create or update every registered role in the host.
    ///
    /// Each role receives its template's capabilities minus any it already
    /// defines. Stops at the first host failure.
    pub fn add(&mut self) -> Result<Vec<RoleChange>> {
        let changes = self.plan();

        for change in &changes {
            self.backend
                .add_role(&change.role, &change.display_name, &change.capabilities)?;

            debug!(
                role = %change.role,
                existed = change.exists,
                capabilities = change.capabilities.len(),
                pruned = change.pruned.len(),
                "Role applied"
            );
        }

        info!(
            backend = self.backend.name(),
            roles = changes.len(),
            "Registered roles added"
        );
        Ok(changes)
    }

    /// Delete every registered role from the host, existing or not.
    pub fn remove(&mut self) -> Result<()> {
        for role in self.roles.keys() {
            self.backend.remove_role(role)?;
            debug!(role = %role, "Role removed");
        }

        info!(
            backend = self.backend.name(),
            roles = self.roles.len(),
            "Registered roles removed"
        );
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Capability Resolution
// ─────────────────────────────────────────────────────────────────

/// Host store as it will look once the changes planned so far are applied.
///
/// Mirrors the adapters' `add_role`: create the role, or merge into it and
/// keep its display name.
struct Projection<'a, S: ?Sized> {
    store: &'a S,
    written: BTreeMap<String, HostRole>,
}

impl<'a, S: RoleStore + ?Sized> Projection<'a, S> {
    fn new(store: &'a S) -> Self {
        Self {
            store,
            written: BTreeMap::new(),
        }
    }

    fn apply(&mut self, change: &RoleChange) {
        let mut role = self
            .get_role(&change.role)
            .unwrap_or_else(|| HostRole::new(change.display_name.as_str()));
        role.merge(&change.capabilities);
        self.written.insert(change.role.clone(), role);
    }
}

impl<S: RoleStore + ?Sized> RoleStore for Projection<'_, S> {
    fn get_role(&self, name: &str) -> Option<HostRole> {
        self.written
            .get(name)
            .cloned()
            .or_else(|| self.store.get_role(name))
    }
}

fn plan_role<S: RoleStore + ?Sized>(store: &S, role: &str, entry: &RoleEntry) -> RoleChange {
    let template_caps = match entry.template.as_deref() {
        Some(template) => store.capabilities_of(template),
        None => Capabilities::new(),
    };

    let Some(existing) = store.get_role(role) else {
        return RoleChange {
            role: role.to_string(),
            display_name: entry.display_name.clone(),
            template: entry.template.clone(),
            exists: false,
            capabilities: template_caps,
            pruned: Vec::new(),
        };
    };

    // A capability already on the role is left alone, whether granted or denied.
    let (pruned, capabilities): (Capabilities, Capabilities) = template_caps
        .into_iter()
        .partition(|(capability, _)| existing.has_capability(capability));

    for capability in pruned.keys() {
        debug!(role = %role, capability = %capability, "Capability already defined, skipping");
    }

    RoleChange {
        role: role.to_string(),
        display_name: entry.display_name.clone(),
        template: entry.template.clone(),
        exists: true,
        capabilities,
        pruned: pruned.into_keys().collect(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::mock::{HostCall, MockConfig, MockHost};
    use crate::roles::types::HostRole;
    use crate::roles::MemoryHost;

    fn caps(pairs: &[(&str, bool)]) -> Capabilities {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn editor() -> HostRole {
        HostRole::new("Editor")
            .with_capability("a", true)
            .with_capability("b", true)
    }

    #[test]
    fn test_get_roles_in_registration_order() {
        let mut mgr = RoleManager::new(MockHost::new());
        mgr.register("seo_manager", "SEO Manager", Some("editor"));
        mgr.register("seo_editor", "SEO Editor", Some("editor"));
        mgr.register("reviewer", "Reviewer", None);

        assert_eq!(mgr.get_roles(), vec!["seo_manager", "seo_editor", "reviewer"]);
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let mut mgr = RoleManager::new(MockHost::new());
        mgr.register("first", "First", None);
        mgr.register("second", "Second", None);
        mgr.register("first", "First Renamed", Some("editor"));

        assert_eq!(mgr.get_roles(), vec!["first", "second"]);
        let entry = mgr.entry("first").unwrap();
        assert_eq!(entry.display_name, "First Renamed");
        assert_eq!(entry.template.as_deref(), Some("editor"));
    }

    #[test]
    fn test_register_does_not_touch_host() {
        let mut mgr = RoleManager::new(MockHost::new());
        mgr.register("seo_manager", "SEO Manager", Some("editor"));

        assert_eq!(mgr.backend().call_count("get_role"), 0);
        assert!(mgr.backend().calls().is_empty());
    }

    #[test]
    fn test_add_copies_template_for_new_role() {
        let mut mgr = RoleManager::new(MockHost::new().with_role("editor", editor()));
        mgr.register("seo_editor", "SEO Editor", Some("editor"));
        mgr.add().unwrap();

        assert_eq!(
            mgr.backend().calls(),
            vec![HostCall::AddRole {
                name: "seo_editor".into(),
                display_name: "SEO Editor".into(),
                capabilities: caps(&[("a", true), ("b", true)]),
            }]
        );
    }

    #[test]
    fn test_add_prunes_capabilities_already_on_role() {
        let host = MockHost::new()
            .with_role("editor", editor())
            .with_role("seo_editor", HostRole::new("SEO Editor").with_capability("a", true));
        let mut mgr = RoleManager::new(host);
        mgr.register("seo_editor", "SEO Editor", Some("editor"));

        let applied = mgr.add().unwrap();

        assert_eq!(
            mgr.backend().added_capabilities("seo_editor"),
            vec![caps(&[("b", true)])]
        );
        assert_eq!(applied[0].pruned, vec!["a".to_string()]);
        assert!(applied[0].exists);
    }

    #[test]
    fn test_add_keeps_existing_denial() {
        let host = MockHost::new()
            .with_role("editor", editor())
            .with_role("seo_editor", HostRole::new("SEO Editor").with_capability("a", false));
        let mut mgr = RoleManager::new(host);
        mgr.register("seo_editor", "SEO Editor", Some("editor"));
        mgr.add().unwrap();

        let role = mgr.backend().store().get_role("seo_editor").unwrap();
        assert_eq!(role.capabilities, caps(&[("a", false), ("b", true)]));
    }

    #[test]
    fn test_add_without_template_sends_empty_set() {
        let mut mgr = RoleManager::new(MockHost::new());
        mgr.register("reviewer", "Reviewer", None);
        mgr.add().unwrap();

        assert_eq!(mgr.backend().added_capabilities("reviewer"), vec![Capabilities::new()]);
    }

    #[test]
    fn test_add_with_unknown_template_sends_empty_set() {
        let mut mgr = RoleManager::new(MockHost::new());
        mgr.register("reviewer", "Reviewer", Some("does_not_exist"));
        mgr.add().unwrap();

        assert_eq!(mgr.backend().added_capabilities("reviewer"), vec![Capabilities::new()]);
    }

    #[test]
    fn test_add_can_template_on_earlier_registered_role() {
        let mut mgr = RoleManager::new(MemoryHost::new().with_role("editor", editor()));
        mgr.register("seo_manager", "SEO Manager", Some("editor"));
        mgr.register("seo_assistant", "SEO Assistant", Some("seo_manager"));
        mgr.add().unwrap();

        let assistant = mgr.backend().get_role("seo_assistant").unwrap();
        assert_eq!(assistant.capabilities, caps(&[("a", true), ("b", true)]));
    }

    #[test]
    fn test_plan_matches_add_and_does_not_write() {
        let host = MockHost::new()
            .with_role("editor", editor())
            .with_role("seo_editor", HostRole::new("SEO Editor").with_capability("b", true));
        let mut mgr = RoleManager::new(host);
        mgr.register("seo_editor", "SEO Editor", Some("editor"));
        mgr.register("seo_manager", "SEO Manager", Some("editor"));

        let planned = mgr.plan();
        assert!(mgr.backend().calls().is_empty());

        let applied = mgr.add().unwrap();
        assert_eq!(planned, applied);
    }

    #[test]
    fn test_plan_matches_add_with_chained_templates() {
        let mut mgr = RoleManager::new(MockHost::new().with_role("editor", editor()));
        mgr.register("seo_manager", "SEO Manager", Some("editor"));
        mgr.register("seo_assistant", "SEO Assistant", Some("seo_manager"));

        let planned = mgr.plan();
        assert!(mgr.backend().calls().is_empty());
        assert!(!planned[1].exists);
        assert_eq!(planned[1].capabilities, caps(&[("a", true), ("b", true)]));

        let applied = mgr.add().unwrap();
        assert_eq!(planned, applied);
        assert_eq!(
            mgr.backend().added_capabilities("seo_assistant"),
            vec![caps(&[("a", true), ("b", true)])]
        );
    }

    #[test]
    fn test_plan_projects_merge_into_existing_template() {
        let host = MockHost::new()
            .with_role("editor", editor())
            .with_role("author", HostRole::new("Author").with_capability("c", true));
        let mut mgr = RoleManager::new(host);
        mgr.register("author", "Author", Some("editor"));
        mgr.register("guest_author", "Guest Author", Some("author"));

        let planned = mgr.plan();
        assert_eq!(
            planned[1].capabilities,
            caps(&[("a", true), ("b", true), ("c", true)])
        );
        assert_eq!(planned, mgr.add().unwrap());
    }

    #[test]
    fn test_remove_calls_host_once_per_role() {
        let mut mgr = RoleManager::new(MockHost::new().with_role("seo_manager", editor()));
        mgr.register("seo_manager", "SEO Manager", Some("editor"));
        mgr.register("seo_editor", "SEO Editor", Some("editor"));
        mgr.remove().unwrap();

        assert_eq!(
            mgr.backend().calls(),
            vec![
                HostCall::RemoveRole { name: "seo_manager".into() },
                HostCall::RemoveRole { name: "seo_editor".into() },
            ]
        );
        assert!(mgr.backend().store().get_role("seo_manager").is_none());
    }

    #[test]
    fn test_add_stops_at_first_failure() {
        let host = MockHost::with_config(MockConfig {
            fail_role: Some("second".into()),
            ..Default::default()
        });
        let mut mgr = RoleManager::new(host);
        mgr.register("first", "First", None);
        mgr.register("second", "Second", None);
        mgr.register("third", "Third", None);

        assert!(mgr.add().is_err());
        assert_eq!(mgr.backend().call_count("add_role"), 2);
        assert!(mgr.backend().store().get_role("first").is_some());
        assert!(mgr.backend().store().get_role("third").is_none());
    }

    #[test]
    fn test_register_all_from_definitions() {
        let defs = vec![
            RoleDefinition {
                name: "seo_manager".into(),
                display_name: "SEO Manager".into(),
                template: Some("editor".into()),
            },
            RoleDefinition {
                name: "seo_editor".into(),
                display_name: "SEO Editor".into(),
                template: None,
            },
        ];

        let mut mgr = RoleManager::new(MemoryHost::new());
        mgr.register_all(&defs);

        assert_eq!(mgr.len(), 2);
        assert_eq!(mgr.entry("seo_editor").unwrap().template, None);
    }
}
