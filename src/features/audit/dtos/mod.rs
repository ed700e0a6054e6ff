mod audit_dto;

pub use audit_dto::AuditLogResponseDto;
