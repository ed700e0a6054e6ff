mod user;

pub use user::{User, UserQuery, UserRole, UserSummary};
