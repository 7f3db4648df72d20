use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::{error::UploadError, services::FileSource},
    domain::models::file::FileInfo,
};

/// A file whose content is already in memory, like a browser `File` from a drop.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    info: FileInfo,
    content: Bytes,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            info: FileInfo::new(name, mime_type, content.len() as u64),
            content,
        }
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn info(&self) -> &FileInfo {
        &self.info
    }

    async fn read(&self) -> Result<Bytes, UploadError> {
        Ok(self.content.clone())
    }
}
