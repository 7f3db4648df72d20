mod log_renderer;
mod view_state_renderer;

pub use log_renderer::LogRenderer;
pub use view_state_renderer::{PageView, ViewStateRenderer};
