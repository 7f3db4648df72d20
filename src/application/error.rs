use thiserror::Error;

pub const NO_FILE_MESSAGE: &str = "Please select an image to analyze.";
pub const ANALYSIS_FALLBACK_MESSAGE: &str = "An error occurred during analysis.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unsupported file type. Please upload JPEG, PNG, or WebP images.")]
    UnsupportedType(String),

    #[error("File is too large. Maximum size is 10MB.")]
    TooLarge { size: u64, max_size: u64 },
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,

    #[error("An analysis is already in progress")]
    Busy,

    #[error("{0}")]
    Application(String),

    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),
}

impl UploadError {
    /// Text shown in the error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Error)]
pub enum CacheStorageError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache index: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum CacheAgentError {
    #[error("Failed to install {url}: {reason}")]
    Installation { url: String, reason: String },

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Fetch failed for {url}: {reason}")]
    Interception { url: String, reason: String },

    #[error(transparent)]
    Storage(#[from] CacheStorageError),
}
