//! Match Engine: candidate pairings between items and their lifecycle.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/matches` | Propose a match (idempotent per pair) |
//! | GET | `/api/matches/mine` | Matches involving own items |
//! | GET | `/api/matches/{id}` | Get a match (parties and admins) |
//! | POST | `/api/matches/{id}/messages` | Add to the conversation |
//!
//! Admin endpoints live under `/api/admin/matches`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::MatchService;
