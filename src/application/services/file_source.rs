use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{application::error::UploadError, domain::models::file::FileInfo};

/// A file handed over by a drop or by the file picker. Metadata is available
/// up front; content is read on demand.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn info(&self) -> &FileInfo;
    async fn read(&self) -> Result<Bytes, UploadError>;
}

/// The staged file: passed validation, owned by the controller until replaced.
#[derive(Clone)]
pub struct SelectedFile {
    pub info: FileInfo,
    pub source: Arc<dyn FileSource>,
}

impl SelectedFile {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        Self {
            info: source.info().clone(),
            source,
        }
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
