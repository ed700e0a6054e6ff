//! User directory.
//!
//! Accounts are provisioned elsewhere; this feature reads them, lets users keep
//! their contact details current and gives admins role and suspension control.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/me` | Get own profile |
//! | PUT | `/api/users/me` | Update name, email and mobile number |
//!
//! Admin endpoints live under `/api/admin/users`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::UserService;
