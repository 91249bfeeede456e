//! Error types for posevis.

use thiserror::Error;

/// The main error type for posevis operations.
#[derive(Error, Debug)]
pub enum PosevisError {
    /// Input data is malformed (wrong arity, non-finite values, bad sizes).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A matrix could not be inverted.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// A named frame is not present in the scene model.
    #[error("frame '{0}' not found in scene")]
    FrameNotFound(String),

    /// Failed to read or interpret a PLY point cloud.
    #[error("PLY error: {0}")]
    Ply(String),

    /// Rendering backend error.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for posevis operations.
pub type Result<T> = std::result::Result<T, PosevisError>;
