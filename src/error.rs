use crate::scheme::Capability;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("Scheme {scheme} does not support {capability}")]
    UnsupportedCapability {
        scheme: String,
        capability: Capability,
    },

    #[error("Invalid input for {scheme}: {message}")]
    InvalidInput { scheme: String, message: String },

    #[error("Key space of {scheme} has {size} keys, limit is {limit}")]
    KeySpaceTooLarge {
        scheme: String,
        size: usize,
        limit: usize,
    },

    #[error("Scheme {0} is already registered")]
    DuplicateScheme(String),

    #[error("Scheme {scheme} is inconsistent: {reason}")]
    InconsistentScheme { scheme: String, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Unknown format label: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, DecodrError>;

/// Failure raised by a single scheme implementation.
///
/// These never leave the crate directly: the dispatcher wraps them into
/// [`DecodrError::InvalidInput`], the brute-forcer and ranker keep them as
/// per-trial outcomes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),

    #[error("bad parameter '{name}': {reason}")]
    BadParam { name: String, reason: String },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("no modular inverse for a={0} mod 26")]
    NoInverse(i64),

    #[error("decoded bytes are not valid UTF-8")]
    NotUtf8,

    #[error("{0} is not implemented by this scheme")]
    NotSupported(Capability),
}

impl SchemeError {
    pub fn bad_param(name: &str, reason: impl Into<String>) -> Self {
        Self::BadParam {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap into the caller-facing error for `scheme`.
    pub fn into_invalid_input(self, scheme: &str) -> DecodrError {
        DecodrError::InvalidInput {
            scheme: scheme.to_string(),
            message: self.to_string(),
        }
    }
}
