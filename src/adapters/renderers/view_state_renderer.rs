use std::sync::Mutex;

use serde::Serialize;

use crate::{
    application::services::renderer::{Renderer, ANALYZE_LABEL, BUSY_LABEL},
    domain::models::analysis::ResultView,
};

/// Observable state of the upload page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    #[serde(rename = "dropHighlighted")]
    pub drop_highlighted: bool,
    /// Text of the error banner while it is visible.
    pub error: Option<String>,
    #[serde(rename = "promptVisible")]
    pub prompt_visible: bool,
    #[serde(rename = "previewVisible")]
    pub preview_visible: bool,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileSize")]
    pub file_size: Option<String>,
    pub dimensions: Option<String>,
    #[serde(rename = "submitEnabled")]
    pub submit_enabled: bool,
    #[serde(rename = "submitLabel")]
    pub submit_label: String,
    pub result: Option<ResultView>,
    #[serde(rename = "scrollCount")]
    pub scroll_count: usize,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            drop_highlighted: false,
            error: None,
            prompt_visible: true,
            preview_visible: false,
            file_name: None,
            file_size: None,
            dimensions: None,
            submit_enabled: false,
            submit_label: ANALYZE_LABEL.to_string(),
            result: None,
            scroll_count: 0,
        }
    }
}

/// Renderer that keeps the page as plain data instead of DOM nodes.
#[derive(Default)]
pub struct ViewStateRenderer {
    view: Mutex<PageView>,
    csrf_token: Option<String>,
}

impl ViewStateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn snapshot(&self) -> PageView {
        self.view.lock().unwrap().clone()
    }
}

impl Renderer for ViewStateRenderer {
    fn set_drop_highlight(&self, active: bool) {
        self.view.lock().unwrap().drop_highlighted = active;
    }

    fn show_error(&self, message: &str) {
        self.view.lock().unwrap().error = Some(message.to_string());
    }

    fn hide_error(&self) {
        self.view.lock().unwrap().error = None;
    }

    fn show_preview(&self, name: &str, size_text: &str) {
        let mut view = self.view.lock().unwrap();
        view.file_name = Some(format!("Name: {}", name));
        view.file_size = Some(format!("Size: {}", size_text));
        view.dimensions = None;
        view.preview_visible = true;
        view.prompt_visible = false;
        view.submit_enabled = true;
    }

    fn show_dimensions(&self, width: u32, height: u32) {
        self.view.lock().unwrap().dimensions = Some(format!("Dimensions: {}×{}", width, height));
    }

    fn set_submitting(&self, submitting: bool) {
        let mut view = self.view.lock().unwrap();
        view.submit_enabled = !submitting;
        view.submit_label = if submitting { BUSY_LABEL } else { ANALYZE_LABEL }.to_string();
    }

    fn show_result(&self, result: &ResultView) {
        let mut view = self.view.lock().unwrap();
        view.result = Some(result.clone());
        view.scroll_count += 1;
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.clone()
    }
}
