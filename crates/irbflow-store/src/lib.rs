//! # irbflow-store
//!
//! The entity-store collaborator consumed by the workflow engine.
//!
//! The traits in [`traits`] are the narrow persistence seam: the engine
//! only ever talks to `ProposalStore`, `UserStore`, and
//! `NotificationStore`. The [`memory`] module provides the in-process
//! implementation used by the server and the test suite; a
//! database-backed implementation would plug in behind the same traits.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{NotificationStore, ProposalMutation, ProposalStore, UserStore};
