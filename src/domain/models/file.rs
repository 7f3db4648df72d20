use bytes::Bytes;
use serde::{Deserialize, Serialize};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Declared metadata of a file offered by a drop or a picker change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    pub fn validate_size(&self, max_size: u64) -> bool {
        self.size <= max_size
    }
}

/// File content as it goes into the multipart body.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Bytes,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Bytes, filename: String, mime_type: String) -> Self {
        Self {
            content,
            filename,
            mime_type,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Rounds half away from zero to one decimal place.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} bytes", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", round_one_decimal(bytes as f64 / KIB as f64))
    } else {
        format!("{:.1} MB", round_one_decimal(bytes as f64 / MIB as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(0), "0 bytes");
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(1023), "1023 bytes");
    }

    #[test]
    fn test_format_file_size_kilobytes() {
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(1280), "1.3 KB");
        assert_eq!(format_file_size(1_048_575), "1024.0 KB");
    }

    #[test]
    fn test_format_file_size_megabytes() {
        assert_eq!(format_file_size(1_048_576), "1.0 MB");
        assert_eq!(format_file_size(5_242_880), "5.0 MB");
        assert_eq!(format_file_size(10_485_760), "10.0 MB");
    }

    #[test]
    fn test_validate_size_is_inclusive() {
        let at_limit = FileInfo::new("a.png", "image/png", 10_485_760);
        let over_limit = FileInfo::new("b.png", "image/png", 10_485_761);
        assert!(at_limit.validate_size(10_485_760));
        assert!(!over_limit.validate_size(10_485_760));
    }
}
