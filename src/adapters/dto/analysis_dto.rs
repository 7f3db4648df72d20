use serde::{Deserialize, Serialize};

use crate::domain::models::analysis::{AnalysisDetails, AnalysisOutcome, AnalysisResult};

pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDetailsDTO {
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

/// JSON body returned by `POST /analyze/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponseDTO {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AnalysisDetailsDTO>,
}

impl From<AnalysisDetailsDTO> for AnalysisDetails {
    fn from(value: AnalysisDetailsDTO) -> Self {
        AnalysisDetails {
            size: value.size,
            width: value.width,
            height: value.height,
            filename: value.filename,
        }
    }
}

impl TryFrom<AnalysisResponseDTO> for AnalysisOutcome {
    type Error = String;

    /// A success body missing its result fields is an unreadable response.
    fn try_from(value: AnalysisResponseDTO) -> Result<Self, Self::Error> {
        if value.status != SUCCESS_STATUS {
            return Ok(AnalysisOutcome::Failure {
                message: value.message,
            });
        }

        let label = value.result.ok_or("success response without 'result'")?;
        let confidence = value
            .confidence
            .ok_or("success response without 'confidence'")?;
        let details = value.details.ok_or("success response without 'details'")?;

        Ok(AnalysisOutcome::Success(AnalysisResult {
            label,
            confidence,
            details: details.into(),
        }))
    }
}
