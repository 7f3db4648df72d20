use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use tracing::debug;

use crate::application::services::ImageDecoder;

/// Reads dimensions from the image header on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderImageDecoder;

impl HeaderImageDecoder {
    pub fn decode_dimensions(content: &[u8]) -> Option<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(content))
            .with_guessed_format()
            .ok()?;

        match reader.into_dimensions() {
            Ok(dimensions) => Some(dimensions),
            Err(e) => {
                debug!("Image decode failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl ImageDecoder for HeaderImageDecoder {
    async fn dimensions(&self, content: Bytes) -> Option<(u32, u32)> {
        tokio::task::spawn_blocking(move || Self::decode_dimensions(&content))
            .await
            .ok()
            .flatten()
    }
}
