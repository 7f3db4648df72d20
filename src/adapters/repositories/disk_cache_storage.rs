use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    adapters::dto::cache_entry_dto::CacheEntryDTO,
    application::{error::CacheStorageError, repositories::cache_storage::CacheStorage},
    domain::models::cache::CachedResponse,
};

const INDEX_FILE: &str = "index.json";

/// Directory name for a cache: ASCII alphanumerics, `-` and `.` pass through,
/// every other byte becomes `_XX` (hex). Reversible, so distinct names never
/// share a directory.
fn encode_cache_name(cache_name: &str) -> String {
    let mut encoded = String::with_capacity(cache_name.len());
    for byte in cache_name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{:02X}", byte));
        }
    }
    encoded
}

fn decode_cache_name(dir_name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(dir_name.len());
    let mut rest = dir_name.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'_' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

/// Cache storage that survives restarts: one directory per cache name holding
/// an `index.json` plus one body file per entry.
pub struct DiskCacheStorage {
    root: PathBuf,
    /// Serializes index read-modify-write cycles.
    lock: Mutex<()>,
}

impl DiskCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    fn cache_dir(&self, cache_name: &str) -> PathBuf {
        self.root.join(encode_cache_name(cache_name))
    }

    async fn read_index(dir: &Path) -> Result<HashMap<String, CacheEntryDTO>, CacheStorageError> {
        let raw = match fs::read(dir.join(INDEX_FILE)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<CacheEntryDTO> = serde_json::from_slice(&raw)
            .map_err(|e| CacheStorageError::Corrupt(format!("{}: {}", dir.display(), e)))?;

        Ok(entries.into_iter().map(|e| (e.url.clone(), e)).collect())
    }

    async fn write_index(
        dir: &Path,
        index: &HashMap<String, CacheEntryDTO>,
    ) -> Result<(), CacheStorageError> {
        let entries: Vec<&CacheEntryDTO> = index.values().collect();
        let raw = serde_json::to_vec_pretty(&entries)
            .map_err(|e| CacheStorageError::Corrupt(e.to_string()))?;

        let tmp = dir.join(format!("{}.tmp", INDEX_FILE));
        fs::write(&tmp, raw).await?;
        fs::rename(&tmp, dir.join(INDEX_FILE)).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, cache_name: &str) -> Result<(), CacheStorageError> {
        fs::create_dir_all(self.cache_dir(cache_name)).await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheStorageError> {
        let mut names = Vec::new();
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            match decode_cache_name(&dir_name) {
                Some(name) => names.push(name),
                None => debug!("Ignoring foreign directory {}", dir_name),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, CacheStorageError> {
        let _guard = self.lock.lock().await;
        match fs::remove_dir_all(self.cache_dir(cache_name)).await {
            Ok(()) => {
                info!("Removed cache directory for {}", cache_name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(
        &self,
        cache_name: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, CacheStorageError> {
        let _guard = self.lock.lock().await;
        let dir = self.cache_dir(cache_name);
        let Some(entry) = Self::read_index(&dir).await?.remove(url) else {
            return Ok(None);
        };

        match fs::read(dir.join(&entry.body_file)).await {
            Ok(body) => Ok(Some(entry.into_response(Bytes::from(body)))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Body file missing for {} in {}", url, cache_name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: CachedResponse,
    ) -> Result<(), CacheStorageError> {
        let _guard = self.lock.lock().await;
        let dir = self.cache_dir(cache_name);
        fs::create_dir_all(&dir).await?;

        let body_file = format!("{}.body", Uuid::new_v4());
        fs::write(dir.join(&body_file), &response.body).await?;

        let mut index = Self::read_index(&dir).await?;
        let replaced = index.insert(
            url.to_string(),
            CacheEntryDTO::from_response(url, &response, body_file),
        );
        Self::write_index(&dir, &index).await?;

        if let Some(old) = replaced {
            if let Err(e) = fs::remove_file(dir.join(&old.body_file)).await {
                debug!("Could not remove replaced body {}: {}", old.body_file, e);
            }
        }

        Ok(())
    }
}
