//! Caller identity and the capability gate.
//!
//! Accounts and credentials are issued elsewhere; this feature verifies bearer
//! tokens, resolves the user they name, and decides what that user may do.

mod validator;

pub mod guards;
pub mod model;

pub use validator::JwtValidator;
