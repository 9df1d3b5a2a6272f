use thiserror::Error;

/// Shown when the service gives no usable error text of its own.
pub const GENERIC_GENERATION_FAILURE: &str = "Failed to generate image";
pub const GENERIC_DOWNLOAD_FAILURE: &str = "Failed to download image";
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Please enter your API key";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Missing credential")]
    MissingCredential,
    #[error("A generation request is already in flight")]
    Busy,
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Download error: {0}")]
    DownloadError(String),
    #[error("No gallery entry at position {0}")]
    InvalidIndex(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Text for the user-facing notification raised by this error.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            StudioError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            StudioError::Api { .. }
            | StudioError::RequestError(_)
            | StudioError::ResponseError(_) => GENERIC_GENERATION_FAILURE.to_string(),
            StudioError::DownloadError(_) | StudioError::Io(_) => {
                GENERIC_DOWNLOAD_FAILURE.to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_service_message() {
        let err = StudioError::Api {
            status: 400,
            message: Some("bad request".into()),
        };
        assert_eq!(err.user_message(), "bad request");
        assert_eq!(err.to_string(), "API error (400): bad request");
    }

    #[test]
    fn api_error_without_message_falls_back() {
        let err = StudioError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_GENERATION_FAILURE);

        let empty = StudioError::Api {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(empty.user_message(), GENERIC_GENERATION_FAILURE);
    }

    #[test]
    fn transport_and_download_errors_use_generic_text() {
        assert_eq!(
            StudioError::RequestError("connection refused".into()).user_message(),
            GENERIC_GENERATION_FAILURE
        );
        assert_eq!(
            StudioError::DownloadError("404".into()).user_message(),
            GENERIC_DOWNLOAD_FAILURE
        );
        assert_eq!(
            StudioError::MissingCredential.user_message(),
            MISSING_CREDENTIAL_MESSAGE
        );
    }
}
