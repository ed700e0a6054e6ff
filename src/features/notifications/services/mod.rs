mod dispatcher;
mod notification_service;

pub use dispatcher::{EmailTemplate, Notice, NotificationDispatcher};
pub use notification_service::NotificationService;
