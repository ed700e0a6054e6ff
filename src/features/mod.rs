pub mod admin;
pub mod audit;
pub mod auth;
pub mod items;
pub mod matches;
pub mod notifications;
pub mod settings;
pub mod users;
