//! # irbflow-entity
//!
//! Domain entity models for IRBFlow: users with role sets, the proposal
//! aggregate and its workflow records, the role→permission policy table,
//! and notification records.

pub mod notification;
pub mod permission;
pub mod proposal;
pub mod user;
