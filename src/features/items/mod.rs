//! Item Store: lost and found reports.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/items` | No | Browse approved items |
//! | GET | `/api/items/{id}` | No | Get an approved item |
//! | POST | `/api/items` | Yes | Report an item |
//! | GET | `/api/items/mine` | Yes | List own items |
//! | PUT | `/api/items/{id}` | Yes | Edit own item |
//! | POST | `/api/items/{id}/resolve` | Yes | Resolve own item |
//!
//! Admin endpoints live under `/api/admin/items`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::ItemService;
