pub mod analysis;
pub mod cache;
pub mod file;
