pub mod analysis_client;
pub mod file_source;
pub mod image_decoder;
pub mod network;
pub mod renderer;

pub use analysis_client::{AnalysisClient, AnalysisRequest};
pub use file_source::{FileSource, SelectedFile};
pub use image_decoder::ImageDecoder;
pub use network::Network;
pub use renderer::Renderer;
