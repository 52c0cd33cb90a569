//! Service wrapper error types

use otc_core::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0} client is not initialized")]
    NotInitialized(&'static str),

    #[error("No '{0}' endpoint in the service catalog")]
    MissingEndpoint(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] otc_config::ConfigError),

    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound(_) | ServiceError::Cloud(CloudError::ResourceNotFound(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
