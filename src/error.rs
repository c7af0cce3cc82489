//! Error types for the monitor codec.
//!
//! All errors are strongly typed using thiserror so callers can match on the
//! exact failure. Nothing is coerced into a default: a monitor that cannot be
//! decoded faithfully is reported, never guessed at.

use thiserror::Error;

/// Failures while reading a single monitor document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed monitor JSON: {source}")]
    Json {
        field: Option<String>,
        line: usize,
        column: usize,
        source: serde_json::Error,
    },

    #[error("Field '{field}' expects a number or null, found {raw}")]
    TypeMismatch {
        field: String,
        raw: String,
    },

    #[error("Monitor document has no string 'type' field")]
    MissingType,

    #[error("Invalid monitor list: {reason}")]
    InvalidEnvelope {
        reason: String,
    },
}

impl DecodeError {
    /// Wrap a serde_json failure, keeping its position.
    pub fn json(source: serde_json::Error) -> Self {
        Self::Json {
            field: None,
            line: source.line(),
            column: source.column(),
            source,
        }
    }

    /// Wrap a schema decode failure, keeping the path of the field it
    /// happened in. The document root has no path.
    pub fn schema(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path();
        let field = path.iter().next().is_some().then(|| path.to_string());
        let source = err.into_inner();
        Self::Json {
            field,
            line: source.line(),
            column: source.column(),
            source,
        }
    }

    /// Name of the offending field, when known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { field, .. } => Some(field.as_str()),
            Self::Json { field, .. } => field.as_deref(),
            Self::MissingType => Some("type"),
            Self::InvalidEnvelope { .. } => None,
        }
    }
}

/// Top-level error type for the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unknown monitor type: {kind:?}")]
    UnknownMonitorType {
        kind: String,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {source}")]
    Encode {
        source: serde_json::Error,
    },

    #[error("Monitor at index {index} failed to decode: {source}")]
    Batch {
        index: usize,
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Creates an encode error.
    #[must_use]
    pub fn encode(source: serde_json::Error) -> Self {
        Self::Encode { source }
    }

    /// Returns true if the discriminator was not one of the known kinds.
    #[must_use]
    pub fn is_unknown_type(&self) -> bool {
        match self {
            Self::UnknownMonitorType { .. } => true,
            Self::Batch { source, .. } => source.is_unknown_type(),
            _ => false,
        }
    }

    /// Returns true if this is a decode error.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        match self {
            Self::Decode(_) => true,
            Self::Batch { source, .. } => source.is_decode(),
            _ => false,
        }
    }

    /// Returns true if an optional numeric field held neither a number nor null.
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Self::Decode(DecodeError::TypeMismatch { .. }) => true,
            Self::Batch { source, .. } => source.is_type_mismatch(),
            _ => false,
        }
    }

    /// Returns true if this is an encode error.
    #[must_use]
    pub const fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }

    /// The rejected discriminator, for `UnknownMonitorType`.
    #[must_use]
    pub fn unknown_type(&self) -> Option<&str> {
        match self {
            Self::UnknownMonitorType { kind } => Some(kind.as_str()),
            Self::Batch { source, .. } => source.unknown_type(),
            _ => None,
        }
    }
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
