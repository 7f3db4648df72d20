mod disk_cache_storage;
mod memory_cache_storage;

pub use disk_cache_storage::DiskCacheStorage;
pub use memory_cache_storage::MemoryCacheStorage;
