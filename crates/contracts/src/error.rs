//! Layered error definitions
//!
//! Categorized by pipeline stage: config / validation / codec

use std::path::PathBuf;

use thiserror::Error;

use crate::{Diagnostic, RecordType, SensorKind};

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    /// Option parsing or tabular file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One or more invariant violations
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Wire payload could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors, surfaced at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required option absent
    #[error("missing required option '{option}'")]
    MissingOption { option: String },

    /// Option present but its value does not parse
    #[error("malformed option '{option}' = '{value}': {reason}")]
    MalformedOption {
        option: String,
        value: String,
        reason: String,
    },

    /// Referenced tabular file could not be read
    #[error("cannot read table '{}' for option '{option}': {message}", .path.display())]
    TableRead {
        option: String,
        path: PathBuf,
        message: String,
    },

    /// Tabular file has the wrong shape
    #[error(
        "table '{}' for option '{option}': row {row} has {found} columns, expected {expected}",
        .path.display()
    )]
    TableShape {
        option: String,
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Tabular file could not be written
    #[error("cannot write table '{}': {message}", .path.display())]
    TableWrite { path: PathBuf, message: String },

    /// Option file parse error
    #[error("option file parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create missing option error
    pub fn missing(option: impl Into<String>) -> Self {
        Self::MissingOption {
            option: option.into(),
        }
    }

    /// Create malformed option error
    pub fn malformed(
        option: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedOption {
            option: option.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create option file parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }
}

/// Every invariant violation found for a run, reported together
#[derive(Debug, Clone, Error)]
#[error("validation failed with {} diagnostic(s)", .diagnostics.len())]
pub struct ValidationFailure {
    pub diagnostics: Vec<Diagnostic>,
}

/// Wire payload errors
///
/// Decoding never yields a partial record: any of these aborts the decode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Payload shorter than the envelope header
    #[error("payload truncated: need at least {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// Payload does not start with the wire magic
    #[error("payload does not carry the wire magic")]
    BadMagic,

    /// Envelope version not understood by this build
    #[error("unsupported wire version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    /// Kind tag does not name a registered sensor kind
    #[error("unknown sensor kind tag {0}")]
    UnknownKind(u8),

    /// Record tag does not name a record type
    #[error("unknown record tag {0}")]
    UnknownRecord(u8),

    /// Payload belongs to another sensor kind
    #[error("payload carries a {found} record, expected {expected}")]
    KindMismatch {
        expected: SensorKind,
        found: SensorKind,
    },

    /// Payload belongs to another record type of the same kind
    #[error("{kind} payload carries a {found} record, expected {expected}")]
    RecordMismatch {
        kind: SensorKind,
        expected: RecordType,
        found: RecordType,
    },

    /// Declared element count disagrees with the flattened data
    #[error("{kind} {record}: '{field}' declares {declared} elements but carries {actual} values")]
    CountMismatch {
        kind: SensorKind,
        record: RecordType,
        field: &'static str,
        declared: u64,
        actual: u64,
    },

    /// Body ended early
    #[error("{kind} {record}: body truncated")]
    TruncatedBody { kind: SensorKind, record: RecordType },

    /// Body bytes do not decode to the record's message
    #[error("{kind} {record}: malformed body: {message}")]
    Malformed {
        kind: SensorKind,
        record: RecordType,
        message: String,
    },

    /// Record could not be encoded
    #[error("{kind} {record}: encode failed: {message}")]
    Encode {
        kind: SensorKind,
        record: RecordType,
        message: String,
    },
}

impl CodecError {
    /// Short machine-readable reason, used as a metrics label
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Truncated { .. } | Self::TruncatedBody { .. } => "truncated",
            Self::BadMagic => "bad_magic",
            Self::UnsupportedVersion { .. } => "version",
            Self::UnknownKind(_) => "unknown_kind",
            Self::UnknownRecord(_) => "unknown_record",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::RecordMismatch { .. } => "record_mismatch",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::Malformed { .. } => "malformed",
            Self::Encode { .. } => "encode",
        }
    }
}
