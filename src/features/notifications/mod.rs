//! Notification Dispatcher and the per-user inbox.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/notifications` | List own notifications |
//! | PATCH | `/api/notifications/{id}/read` | Mark one as read |
//! | PATCH | `/api/notifications/mark-all-read` | Mark all as read |
//! | DELETE | `/api/notifications/{id}` | Delete one |
//! | DELETE | `/api/notifications/bulk` | Delete several |
//! | DELETE | `/api/notifications/clear-all` | Delete all |
//!
//! Admin endpoints live under `/api/admin/notifications`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::{NotificationDispatcher, NotificationService};
