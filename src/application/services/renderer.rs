use crate::domain::models::analysis::ResultView;

pub const ANALYZE_LABEL: &str = "Analyze Image";
pub const BUSY_LABEL: &str = "Analyzing...";

/// The page elements the upload controller drives.
pub trait Renderer: Send + Sync {
    fn set_drop_highlight(&self, active: bool);
    fn show_error(&self, message: &str);
    fn hide_error(&self);
    /// Reveals the preview with its `Name:` and `Size:` lines and enables submit.
    fn show_preview(&self, name: &str, size_text: &str);
    fn show_dimensions(&self, width: u32, height: u32);
    /// Disables submit and swaps in the busy label, or restores both.
    fn set_submitting(&self, submitting: bool);
    /// Replaces the whole result section, reveals it and scrolls it into view.
    fn show_result(&self, view: &ResultView);
    /// Anti-forgery token embedded in the page's form.
    fn csrf_token(&self) -> Option<String>;
}
