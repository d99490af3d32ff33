//! Error types for scene serialization

use std::path::PathBuf;

use thiserror::Error;

use crate::record::{ResourceId, ResourceKind};
use crate::value::ValueType;

/// Errors raised while encoding or decoding a single property value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// A flagged component has no token in the payload
    #[error("component {index} is flagged but missing from the payload")]
    MissingComponent { index: usize },

    /// A flagged component could not be parsed as a number
    #[error("component {index} is not a number: {token:?}")]
    InvalidComponent { index: usize, token: String },

    /// An integer does not fit the decoded type
    #[error("value {value:#x} is out of range for {value_type:?}")]
    OutOfRange { value_type: ValueType, value: u32 },

    /// No encoder/decoder registered for the type
    #[error("no codec registered for {0:?}")]
    Unregistered(ValueType),
}

/// Scene serialization errors
#[derive(Debug, Error)]
pub enum SerializeError {
    /// File I/O error
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Binary encoding/decoding error
    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Resource id does not fit in a wire record
    #[error("Resource id {0} does not fit in a dependency record")]
    IdOutOfRange(ResourceId),

    /// Wire kind that no resource kind maps to
    #[error("Unknown resource kind: {0}")]
    UnknownKind(i16),

    /// A resource has neither inline data nor a named source file
    #[error("No source data or file name for {0:?}")]
    MissingSource(ResourceKind),

    /// External file name would leave the output root
    #[error("External file name escapes the output root: {0:?}")]
    InvalidOutputName(String),

    /// Container does not start with a known magic number
    #[error("Invalid magic number: {0:#010x}")]
    InvalidMagic(u32),

    /// Container was written by a newer format version
    #[error("Unsupported version: {0}.{1}")]
    UnsupportedVersion(u8, u8),

    /// Container is shorter than its header claims
    #[error("Truncated container: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    /// Effect source is not valid UTF-8
    #[error("Effect source is not valid UTF-8: {0}")]
    InvalidEffectSource(#[from] std::string::FromUtf8Error),

    /// Writer options file could not be parsed
    #[error("Writer options parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Writer options contain an unknown keyword
    #[error("Invalid writer option {key}: {value:?}")]
    InvalidOption { key: &'static str, value: String },
}

impl SerializeError {
    /// Wrap an I/O error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SerializeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for serialization operations
pub type SerializeResult<T> = Result<T, SerializeError>;
