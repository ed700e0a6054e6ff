mod notification_dto;

pub use notification_dto::{
    AdminNotificationQueryParams, AdminNotificationResponseDto, BulkDeleteNotificationsDto,
    DeletedCountDto, DispatchReport, EmailDeliveryResult, ModifiedCountDto,
    NotificationResponseDto, SendNotificationDto,
};
