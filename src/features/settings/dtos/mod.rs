mod setting_dto;

pub use setting_dto::{SettingEntryDto, SettingsDto, UpdateSettingsDto};
