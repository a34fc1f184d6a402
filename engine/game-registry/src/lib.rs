//! Game Registry - Maps role and map identifiers to display names
//!
//! Both directories are read-only snapshots. A lookup for an id the directory
//! does not know never fails: it yields a synthesized placeholder label instead.

pub mod maps;
pub mod roles;
pub mod types;

pub use maps::MapDirectory;
pub use roles::RoleDirectory;
pub use types::{MapGroup, RegistryError, RoleEntry};
