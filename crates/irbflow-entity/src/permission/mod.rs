//! Permission model: capability enumeration and the role policy table.

pub mod action;
pub mod policies;

pub use action::Permission;
pub use policies::{has_permission, permissions_for};
