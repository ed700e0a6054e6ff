pub mod dashboard_handlers;
pub mod item_handlers;
pub mod match_handlers;
pub mod notification_handlers;
pub mod setting_handlers;
pub mod user_handlers;
