//! role-registrar - declarative role registration for host role stores
//!
//! Declare roles once, each optionally based on a template role, then apply
//! them to the host platform or remove them again:
//!
//! ```
//! use role_registrar::roles::{HostRole, MemoryHost, RoleManager, RoleStore};
//!
//! let host = MemoryHost::new().with_role(
//!     "editor",
//!     HostRole::new("Editor").with_capability("edit_posts", true),
//! );
//!
//! let mut manager = RoleManager::new(host);
//! manager.register("seo_editor", "SEO Editor", Some("editor"));
//! manager.add().unwrap();
//!
//! let role = manager.backend().get_role("seo_editor").unwrap();
//! assert_eq!(role.capabilities.get("edit_posts"), Some(&true));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod roles;
pub mod version;

pub use error::{Error, ErrorCode, Result};
