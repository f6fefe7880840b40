//! Error types for the linecode-sim pipeline.
//!
//! Structural problems are surfaced immediately to the caller. Corrupted line
//! symbols are not errors at the line coding layer: Manchester decoding reports
//! them inline as [`LineSymbol::Invalid`](crate::line::LineSymbol::Invalid).
//! They only become an error if they reach text reconstruction on the strict
//! path.

use crate::bits::Charset;
use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit codec: text <-> bit conversion
/// - Source coding: method tag validation
/// - Line coding: parsing chip text
/// - Persistence: structured file contents
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Text/bit conversion failed
    #[error("bit codec error: {0}")]
    BitCodec(#[from] BitCodecError),

    /// Source coding error (e.g., unknown method tag)
    #[error("source coding error: {0}")]
    SourceCoding(#[from] SourceCodingError),

    /// Line coding error (e.g., a chip string containing something other than 0/1)
    #[error("line coding error: {0}")]
    LineCoding(#[from] LineCodingError),

    /// Persisted payload could not be interpreted
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors converting between text and bits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitCodecError {
    /// Bit count is not a multiple of 8 (strict decode only)
    #[error("invalid bit count {len}: not a multiple of 8")]
    InvalidLength { len: usize },

    /// Decoded bytes are not valid text in the charset (strict decode only)
    #[error("bytes are not valid {charset}: {reason}")]
    InvalidText { charset: Charset, reason: String },

    /// A character has no representation in the target charset
    #[error("character {ch:?} cannot be encoded as {charset}")]
    Unencodable { ch: char, charset: Charset },

    /// A corrupted line symbol reached text reconstruction (strict decode only)
    #[error("invalid line symbol at position {position}")]
    InvalidSymbol { position: usize },
}

/// Source coding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceCodingError {
    /// Method tag is not one this crate knows how to decode
    #[error("unsupported source coding method {method:?}: only \"raw\" is supported")]
    UnsupportedMethod { method: String },
}

/// Line coding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineCodingError {
    /// A character other than '0' or '1' in chip text
    #[error("invalid chip {ch:?} at position {position}")]
    InvalidChip { ch: char, position: usize },
}

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Required fields are absent or have the wrong shape
    #[error("malformed payload file: {reason}")]
    MalformedFile { reason: String },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
