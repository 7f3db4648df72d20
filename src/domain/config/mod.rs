pub mod cache;
pub mod upload;
