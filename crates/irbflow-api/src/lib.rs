//! # irbflow-api
//!
//! HTTP API layer for IRBFlow built on Axum.
//!
//! Provides the REST endpoints, actor extraction, DTOs (including the
//! reviewer-identity projection), and error mapping. Identity comes from
//! a trusted upstream header; this crate performs no authentication of
//! its own.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
