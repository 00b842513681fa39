pub mod admin_dto;
pub mod quote_dto;
