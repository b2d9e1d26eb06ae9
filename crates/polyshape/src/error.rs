//! Error type shared by loading, geometry, and the centroid collaborator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning one polygon file into derived outputs.
///
/// Every variant is scoped to a single polygon; callers decide whether to
/// keep going with the rest of a batch.
#[derive(Debug, Error)]
pub enum PolyError {
    /// The polygon file is not a JSON array of rings of `[x, y]` pairs.
    #[error("malformed polygon `{name}`: {message}")]
    MalformedInput { name: String, message: String },

    /// The centroid/area collaborator failed or produced unusable output.
    #[error("centroid collaborator failed for `{name}`: {message}")]
    Collaborator { name: String, message: String },

    /// Too few points for the requested construction.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PolyError {
    pub(crate) fn malformed(name: &str, message: impl Into<String>) -> Self {
        PolyError::MalformedInput {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn collaborator(name: &str, message: impl Into<String>) -> Self {
        PolyError::Collaborator {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PolyError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = PolyError> = std::result::Result<T, E>;
