mod error;
mod image_decoder;
mod reqwest_analysis_client;
mod reqwest_network;

pub use error::TransportError;
pub use image_decoder::HeaderImageDecoder;
pub use reqwest_analysis_client::ReqwestAnalysisClient;
pub use reqwest_network::ReqwestNetwork;
