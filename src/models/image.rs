use serde::{Deserialize, Serialize};

/// JSON body of `POST /v1/images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
    pub style: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

/// Failure body. Every level is optional; services differ in what they send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn message(self) -> Option<String> {
        self.error.and_then(|e| e.message)
    }
}

/// One finished image in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}

impl ImageData {
    /// Converts the entry into a gallery item. Inline base64 payloads become
    /// `data:` URLs so they can be saved the same way as remote ones.
    pub fn into_generated(self) -> Option<GeneratedImage> {
        let url = match (self.url, self.b64_json) {
            (Some(url), _) if !url.is_empty() => url,
            (_, Some(b64)) if !b64.is_empty() => format!("data:image/png;base64,{}", b64),
            _ => return None,
        };

        Some(GeneratedImage {
            url,
            revised_prompt: self.revised_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_url_response() {
        let body = json!({"data": [{"url": "https://x/img.png", "revised_prompt": "a cat"}]});
        let response: ImageGenerationResponse = serde_json::from_value(body).unwrap();
        let image = response.data.into_iter().next().unwrap().into_generated().unwrap();

        assert_eq!(image.url, "https://x/img.png");
        assert_eq!(image.revised_prompt.as_deref(), Some("a cat"));
    }

    #[test]
    fn inline_payload_becomes_data_url() {
        let body = json!({"created": 1, "data": [{"b64_json": "aGVsbG8="}]});
        let response: ImageGenerationResponse = serde_json::from_value(body).unwrap();
        let image = response.data.into_iter().next().unwrap().into_generated().unwrap();

        assert_eq!(image.url, "data:image/png;base64,aGVsbG8=");
        assert!(image.revised_prompt.is_none());
    }

    #[test]
    fn entry_without_image_is_rejected() {
        let data: ImageData = serde_json::from_value(json!({"revised_prompt": "x"})).unwrap();
        assert!(data.into_generated().is_none());
    }

    #[test]
    fn error_body_message_is_optional() {
        let full: ApiErrorBody =
            serde_json::from_value(json!({"error": {"message": "bad request", "type": "invalid_request_error"}}))
                .unwrap();
        assert_eq!(full.message().as_deref(), Some("bad request"));

        let bare: ApiErrorBody = serde_json::from_value(json!({"error": {}})).unwrap();
        assert!(bare.message().is_none());

        let empty: ApiErrorBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.message().is_none());
    }

    #[test]
    fn request_serializes_fixed_fields() {
        let request = ImageGenerationRequest {
            model: "dall-e-3".into(),
            prompt: "p".into(),
            n: 1,
            size: "1024x1024".into(),
            quality: "hd".into(),
            style: "vivid".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "dall-e-3",
                "prompt": "p",
                "n": 1,
                "size": "1024x1024",
                "quality": "hd",
                "style": "vivid"
            })
        );
    }
}
