use tracing::{info, warn};

use crate::{
    application::services::renderer::{Renderer, ANALYZE_LABEL, BUSY_LABEL},
    domain::models::analysis::ResultView,
};

/// Headless renderer: every page update becomes a log line.
pub struct LogRenderer {
    csrf_token: Option<String>,
}

impl LogRenderer {
    pub fn new(csrf_token: Option<String>) -> Self {
        Self { csrf_token }
    }
}

impl Renderer for LogRenderer {
    fn set_drop_highlight(&self, _active: bool) {}

    fn show_error(&self, message: &str) {
        warn!("{}", message);
    }

    fn hide_error(&self) {}

    fn show_preview(&self, name: &str, size_text: &str) {
        info!("Name: {}", name);
        info!("Size: {}", size_text);
    }

    fn show_dimensions(&self, width: u32, height: u32) {
        info!("Dimensions: {}×{}", width, height);
    }

    fn set_submitting(&self, submitting: bool) {
        info!("{}", if submitting { BUSY_LABEL } else { ANALYZE_LABEL });
    }

    fn show_result(&self, view: &ResultView) {
        info!("Result: {} [{}]", view.label, view.label_class);
        info!("{} ({})", view.confidence_text, view.bar_class);
        info!(
            "Details: {}, {}, {}",
            view.size_text, view.dimensions_text, view.filename
        );
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.clone()
    }
}
