use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::{
    application::{error::UploadError, services::FileSource},
    domain::models::file::FileInfo,
};

/// Declared type from the extension, the way a file picker reports it.
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// A file on disk. Metadata is taken at construction; content is read on demand.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    info: FileInfo,
}

impl DiskFile {
    pub async fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let info = FileInfo::new(name, mime_type_for(&path), metadata.len());

        debug!("Opened {} as {:?}", path.display(), info);
        Ok(Self { path, info })
    }
}

#[async_trait]
impl FileSource for DiskFile {
    fn info(&self) -> &FileInfo {
        &self.info
    }

    async fn read(&self) -> Result<Bytes, UploadError> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|e| UploadError::Network(format!("Cannot read {}: {}", self.path.display(), e)))
    }
}
