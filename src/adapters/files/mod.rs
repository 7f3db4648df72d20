mod disk_file;
mod memory_file;

pub use disk_file::{mime_type_for, DiskFile};
pub use memory_file::MemoryFile;
