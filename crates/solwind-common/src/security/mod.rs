//! Access control
//!
//! - [`permissions`]: fixed role → permission table

pub mod permissions;

pub use permissions::{
    available_roles, can_edit_project, has_permission, has_permission_named, role_permissions,
    Permission, Role,
};
