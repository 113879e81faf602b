//! Notification dispatch and read API.

pub mod dispatcher;
pub mod service;

pub use dispatcher::NotificationDispatcher;
pub use service::NotificationService;
