pub mod analysis_dto;
pub mod cache_entry_dto;
