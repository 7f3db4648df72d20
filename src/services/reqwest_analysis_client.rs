use async_trait::async_trait;
use reqwest::{multipart, Client};
use tracing::{debug, info};

use crate::{
    adapters::dto::analysis_dto::AnalysisResponseDTO,
    application::{
        error::UploadError,
        services::{AnalysisClient, AnalysisRequest},
    },
    domain::{config::upload::UploadConfig, models::analysis::AnalysisOutcome},
    services::error::TransportError,
};

pub struct ReqwestAnalysisClient {
    client: Client,
    base_url: String,
    config: UploadConfig,
}

impl ReqwestAnalysisClient {
    pub fn new(base_url: &str, config: UploadConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.config.analyze_url)
    }
}

#[async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, UploadError> {
        let file_part = multipart::Part::bytes(request.file.content.to_vec())
            .file_name(request.file.filename.clone())
            .mime_str(&request.file.mime_type)
            .map_err(TransportError::from)?;

        let form = multipart::Form::new().part(self.config.field_name.clone(), file_part);

        let mut builder = self.client.post(self.endpoint()).multipart(form);
        if let Some(token) = &request.csrf_token {
            builder = builder.header(self.config.csrf_header.as_str(), token);
        }

        info!(
            "POST {} with '{}' ({} bytes)",
            self.endpoint(),
            request.file.filename,
            request.file.size()
        );

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status();

        // The body decides success, whatever the HTTP status.
        let body: AnalysisResponseDTO = response.json().await.map_err(TransportError::from)?;
        debug!("Analysis response {}: {:?}", status, body);

        AnalysisOutcome::try_from(body)
            .map_err(|e| TransportError::Decode(e).into())
    }
}
