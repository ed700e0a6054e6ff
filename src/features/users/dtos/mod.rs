mod user_dto;

pub use user_dto::{
    AdminUserQueryParams, SetUserRoleDto, SetUserSuspendedDto, UpdateProfileDto, UserProfileDto,
};
