/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum items returned by public browse
pub const BROWSE_LIMIT: i64 = 100;

/// Maximum matches returned by a user's match list
pub const MY_MATCHES_LIMIT: i64 = 100;

/// Maximum notifications returned by a user's inbox
pub const INBOX_LIMIT: i64 = 50;

/// Maximum length of a match conversation message
pub const MATCH_MESSAGE_MAX_LEN: usize = 2000;

// =============================================================================
// NOTIFICATION TYPES
// =============================================================================

/// Notification type used when none is given
pub const NOTIFICATION_TYPE_GENERAL: &str = "general";

/// Notification type for anything concerning a match
pub const NOTIFICATION_TYPE_MATCH: &str = "match";

/// In-app message sent to both owners when a match is created
pub const MATCH_CREATED_MESSAGE: &str = "A potential match was created for your item.";

/// Per-recipient email error reported when SMTP is not configured
pub const EMAIL_NOT_CONFIGURED: &str = "Email service not configured. Please contact administrator.";
