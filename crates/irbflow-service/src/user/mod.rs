//! User management.

pub mod service;

pub use service::{UpdateUserRequest, UserService};
