use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ImageDecoder: Send + Sync {
    /// Pixel width and height, or `None` when the content cannot be decoded.
    async fn dimensions(&self, content: Bytes) -> Option<(u32, u32)>;
}
