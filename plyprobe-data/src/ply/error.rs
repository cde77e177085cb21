//! Error types for PLY loading and attribute access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while decoding a PLY file or reading its vertex fields.
#[derive(Debug, Error)]
pub enum PlyError {
    #[error("Failed to open PLY file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PLY parsing error: {0}")]
    Decode(#[from] std::io::Error),

    #[error("Invalid PLY file: {0}")]
    InvalidContainer(String),

    #[error("Property '{name}' not found. Available properties: {}", .available.join(", "))]
    AttributeNotFound { name: String, available: Vec<String> },

    #[error("List property '{name}' has rows of differing length")]
    RaggedList { name: String },

    #[error("Property '{name}' has shape {found}, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

impl PlyError {
    /// The missing field name, if this is an `AttributeNotFound` error.
    pub fn missing_attribute(&self) -> Option<&str> {
        match self {
            PlyError::AttributeNotFound { name, .. } => Some(name),
            _ => None,
        }
    }
}
