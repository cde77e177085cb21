//! Error types for the inspector binary.

use plyprobe_data::PlyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ply(#[from] PlyError),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
