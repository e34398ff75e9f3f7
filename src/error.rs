use axum::extract::multipart::{MultipartError, MultipartRejection};
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind to {1}: {0}")]
    BindError(std::io::Error, String),
    #[error("Server stopped unexpectedly: {0}")]
    ServeError(std::io::Error),
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request Error: {0}")]
    RequestError(#[from] RequestError),
    #[error("Analysis Error: {0}")]
    AnalysisError(#[from] AnalysisError),
    #[error("Storage Error: {0}")]
    StorageError(#[from] StorageError),
}

// Errors raised while reading a form upload
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Expected a multipart/form-data request: {0}")]
    NotMultipart(#[from] MultipartRejection),
    #[error("Failed to read multipart body: {0}")]
    MultipartError(#[from] MultipartError),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to decode image: {0}")]
    DecodeError(#[from] image::ImageError),
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} image")]
    CoordinateOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("Missing form field: {0}")]
    MissingField(&'static str),
    #[error("Invalid coordinates in {field}: {source}")]
    InvalidCoordinates {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("Analysis task failed: {0}")]
    JoinError(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid image id: {0}")]
    InvalidImageId(String),
    #[error("Image not found: {0}")]
    NotFound(String),
}
