use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    #[serde(rename = "mimeTypes")]
    pub mime_types: Vec<String>,
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    #[serde(rename = "analyzeUrl")]
    pub analyze_url: String,
    #[serde(rename = "csrfHeader")]
    pub csrf_header: String,
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

impl UploadConfig {
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m == mime_type)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            max_size: MAX_UPLOAD_SIZE,
            analyze_url: "/analyze/".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            field_name: "image".to_string(),
        }
    }
}
