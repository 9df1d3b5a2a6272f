use std::env;
use std::path::PathBuf;

use crate::prompt::DEFAULT_TEMPLATE;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const DEFAULT_MODEL: &str = "dall-e-3";
pub const DEFAULT_SIZE: &str = "1024x1024";
pub const DEFAULT_QUALITY: &str = "hd";
pub const DEFAULT_STYLE: &str = "vivid";
pub const DEFAULT_FILE_PREFIX: &str = "generated-image-";
pub const DEFAULT_FILE_EXTENSION: &str = "png";

/// Settings for the generation endpoint and the download target.
///
/// The API key is not part of this struct. It only lives
/// in the form state of a running [`crate::Studio`].
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub endpoint: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub style: String,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub template: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            size: DEFAULT_SIZE.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            style: DEFAULT_STYLE.to_string(),
            output_dir: PathBuf::from("."),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = env::var("RGENART_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(model) = env::var("RGENART_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(dir) = env::var("RGENART_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}
