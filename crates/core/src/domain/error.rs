// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("URL is required")]
    UrlMissing,

    #[error("URL must be an absolute http:// or https:// URL")]
    UrlInvalid,

    #[error("Unknown task status: {0}")]
    UnknownStatus(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
