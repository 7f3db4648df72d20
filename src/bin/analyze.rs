use std::sync::Arc;

use realface_web::{
    adapters::{files::DiskFile, renderers::LogRenderer},
    application::{services::FileSource, upload_controller::UploadController},
    domain::config::upload::UploadConfig,
    services::{HeaderImageDecoder, ReqwestAnalysisClient},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: realface-analyze <image>");
        std::process::exit(2);
    };

    let base_url =
        std::env::var("REALFACE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let csrf_token = std::env::var("CSRF_TOKEN").ok();

    let config = UploadConfig::default();
    let controller = UploadController::new(
        config.clone(),
        Arc::new(LogRenderer::new(csrf_token)),
        Arc::new(ReqwestAnalysisClient::new(&base_url, config)),
        Arc::new(HeaderImageDecoder),
    );

    let file: Arc<dyn FileSource> = match DiskFile::open(&path).await {
        Ok(file) => Arc::new(file),
        Err(e) => {
            tracing::error!("Cannot open {}: {}", path, e);
            std::process::exit(1);
        }
    };

    match controller.pick_files(vec![file]) {
        Ok(Some(decode)) => {
            if let Err(e) = decode.await {
                tracing::warn!("Preview decode task failed: {}", e);
            }
        }
        Ok(None) => {}
        Err(_) => std::process::exit(1),
    }

    if controller.submit().await.is_err() {
        std::process::exit(1);
    }
}
