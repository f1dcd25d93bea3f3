//! Role registration and host synchronization
//!
//! A plugin declares roles with [`RoleManager::register`], then applies them
//! with [`RoleManager::add`] or deletes them with [`RoleManager::remove`].
//! The host platform owns all role data and is reached through the
//! [`RoleStore`] and [`RoleBackend`] traits.

mod json_file;
mod manager;
mod memory;
pub mod mock;
mod registry;
mod traits;
mod types;

pub use json_file::JsonFileHost;
pub use manager::RoleManager;
pub use memory::MemoryHost;
pub use mock::{HostCall, MockConfig, MockHost};
pub use registry::{open_host, HostKind};
pub use traits::{RoleBackend, RoleStore};
pub use types::{Capabilities, HostRole, RoleChange, RoleDefinition, RoleEntry};
