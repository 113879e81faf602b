//! User entity: model, roles, and affiliation.

pub mod model;
pub mod role;

pub use model::{Affiliation, CreateUser, User, UserKind};
pub use role::UserRole;
