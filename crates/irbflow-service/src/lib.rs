//! # irbflow-service
//!
//! Business logic for IRBFlow: the proposal transition engine with its
//! reviewer-completion detector and certificate issuer, the notification
//! dispatcher, and user management. Services orchestrate the store
//! traits and never hold ambient session state; every call receives an
//! explicit [`context::ActorContext`].

pub mod context;
pub mod notification;
pub mod proposal;
pub mod user;
