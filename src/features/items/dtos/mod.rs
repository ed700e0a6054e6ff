mod item_dto;

pub use item_dto::{
    AdminItemQueryParams, AdminItemResponseDto, BrowseItemsQuery, CreateItemDto, ItemResponseDto,
    ItemStatusFilter, ModerateItemDto, SetItemResolvedDto, UpdateItemDto,
};
