//! Cloud resource error types

use thiserror::Error;

/// Errors shared by every service wrapper
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource {id} entered status {status}")]
    ResourceFailed { id: String, status: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Wait cancelled: {0}")]
    Cancelled(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
