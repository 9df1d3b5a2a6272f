use crate::{
    api::traits::ImageService,
    config::StudioConfig,
    error::{Result, StudioError},
    models::{ApiErrorBody, GeneratedImage, ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
    model: String,
    size: String,
    quality: String,
    style: String,
}

impl ImageClient {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            size: config.size.clone(),
            quality: config.quality.clone(),
            style: config.style.clone(),
        }
    }

    pub fn build_request(&self, prompt: &str) -> ImageGenerationRequest {
        ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.size.clone(),
            quality: self.quality.clone(),
            style: self.style.clone(),
        }
    }

    fn build_headers(&self, credential: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credential)).map_err(|_| {
            StudioError::RequestError("API key contains characters not allowed in a header".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ImageService for ImageClient {
    async fn generate(&self, credential: &str, prompt: &str) -> Result<GeneratedImage> {
        let payload = self.build_request(prompt);
        log::debug!(
            "Image request: model={} size={} quality={} style={} prompt_chars={}",
            payload.model,
            payload.size,
            payload.quality,
            payload.style,
            payload.prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers(credential)?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(format!("Image request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StudioError::RequestError(format!("Reading response failed: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .and_then(ApiErrorBody::message);
            log::error!(
                "Image service answered {}: {}",
                status,
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(StudioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ImageGenerationResponse = serde_json::from_slice(&body)
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|entry| entry.into_generated())
            .ok_or_else(|| StudioError::ResponseError("No images generated".into()))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::DownloadError(format!("Fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::DownloadError(format!(
                "Fetch of {} answered {}",
                url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StudioError::DownloadError(format!("Reading body failed: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
