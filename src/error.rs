//! Error types for gfaio

use thiserror::Error;

/// Result type alias for gfaio operations
pub type Result<T> = std::result::Result<T, GfaError>;

/// Main error type for gfaio
#[derive(Error, Debug)]
pub enum GfaError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record line with too few fields or an invalid orientation token
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A CIGAR string that does not tokenize as (run length, op letter) pairs
    #[error("malformed CIGAR: {0}")]
    MalformedCigar(String),

    /// A CIGAR operation letter outside the supported {M, I, D} set
    #[error("unsupported CIGAR operation '{0}'")]
    UnsupportedCigarOp(char),

    /// A second header line in the same file
    #[error("duplicate header line")]
    DuplicateHeader,

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A parse failure located at a specific input line
    #[error("parse error at line {line} ({text:?}): {source}")]
    AtLine {
        line: usize,
        text: String,
        #[source]
        source: Box<GfaError>,
    },
}

impl From<serde_json::Error> for GfaError {
    fn from(err: serde_json::Error) -> Self {
        GfaError::Serialization(err.to_string())
    }
}

impl GfaError {
    /// Wrap a parse error with the line number and raw line text it occurred on.
    pub(crate) fn at_line(self, line: usize, text: &str) -> GfaError {
        GfaError::AtLine {
            line,
            text: text.to_string(),
            source: Box::new(self),
        }
    }
}
