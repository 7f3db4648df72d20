use serde::{Deserialize, Serialize};

use super::file::{format_file_size, round_one_decimal};

pub const REAL_IMAGE_LABEL: &str = "Real Image";

/// Binary collapse of the server label: only the exact "Real Image" literal is real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "real")]
    Real,
    #[serde(rename = "ai")]
    Ai,
}

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        if label == REAL_IMAGE_LABEL {
            Verdict::Real
        } else {
            Verdict::Ai
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Verdict::Real => "real",
            Verdict::Ai => "ai",
        }
    }

    pub fn bar_class(&self) -> &'static str {
        match self {
            Verdict::Real => "bg-success",
            Verdict::Ai => "bg-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: String,
    pub confidence: f64,
    pub details: AnalysisDetails,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(&self.label)
    }
}

/// What the server said about one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    Failure { message: Option<String> },
}

/// Formats a [0,1] score as a percentage with one decimal, e.g. `87.3%`.
pub fn format_percentage(score: f64) -> String {
    format!("{:.1}%", round_one_decimal(score * 100.0))
}

/// Everything the result section shows for one result. Built fresh per result,
/// so nothing from an earlier result survives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub label: String,
    #[serde(rename = "labelClass")]
    pub label_class: &'static str,
    #[serde(rename = "barWidth")]
    pub bar_width: String,
    #[serde(rename = "barClass")]
    pub bar_class: &'static str,
    #[serde(rename = "confidenceText")]
    pub confidence_text: String,
    #[serde(rename = "sizeText")]
    pub size_text: String,
    #[serde(rename = "dimensionsText")]
    pub dimensions_text: String,
    pub filename: String,
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        let verdict = result.verdict();
        let percentage = format_percentage(result.confidence);

        Self {
            label: result.label.clone(),
            label_class: verdict.css_class(),
            bar_width: percentage.clone(),
            bar_class: verdict.bar_class(),
            confidence_text: format!("Confidence: {}", percentage),
            size_text: format_file_size(result.details.size),
            dimensions_text: format!("{}×{}", result.details.width, result.details.height),
            filename: result.details.filename.clone(),
        }
    }
}
