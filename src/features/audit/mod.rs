//! Audit Recorder.
//!
//! Admin mutations leave an immutable trail here. Recording never blocks or
//! fails the operation that triggered it.

pub mod dtos;
pub mod models;
pub mod repository;
pub mod services;

pub use services::AuditRecorder;
