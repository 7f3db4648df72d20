pub mod cache_storage;
