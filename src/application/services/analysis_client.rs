use async_trait::async_trait;

use crate::{
    application::error::UploadError,
    domain::models::{analysis::AnalysisOutcome, file::FileData},
};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file: FileData,
    pub csrf_token: Option<String>,
}

/// One multipart round trip to the analysis endpoint. Transport failures and
/// unreadable bodies come back as `UploadError::Network`.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, UploadError>;
}
