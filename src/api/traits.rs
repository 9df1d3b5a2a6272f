use crate::{error::Result, models::GeneratedImage};
use async_trait::async_trait;

/// The network side of the studio: one generation call and a plain fetch
/// used by downloads.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate(&self, credential: &str, prompt: &str) -> Result<GeneratedImage>;

    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
