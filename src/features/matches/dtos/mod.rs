mod match_dto;

pub use match_dto::{
    AdminMatchQueryParams, AppendMessageDto, CreateMatchDto, MatchItemDto, MatchResponseDto,
    SendMatchEmailDto, UpdateMatchStatusDto,
};
