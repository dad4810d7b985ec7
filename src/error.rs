use std::string::FromUtf8Error;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PymaError>;

// ---------------------------------------------------------------------------
// PymaError – every way decoding or applying a pipeline can fail
// ---------------------------------------------------------------------------

/// Errors raised while decoding serialized state or applying stages.
///
/// All variants are terminal for the call that produced them: a failed
/// decode returns no partial pipeline, a failed apply returns no partial
/// vector.
#[derive(Debug, Error)]
pub enum PymaError {
    /// The byte source ran out before a field was fully read.
    #[error("truncated input at byte {offset}: needed {needed} bytes, only {available} available")]
    TruncatedInput {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// The underlying reader failed for a reason other than running dry.
    #[error("I/O error while reading state: {0}")]
    Io(#[from] std::io::Error),

    /// A declared or required dimension is invalid.
    #[error("invalid shape: {0}")]
    ShapeError(String),

    /// Two dimensions that must agree do not.
    #[error("shape mismatch in {context}: expected {expected} values, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// A length-prefixed string field is not valid UTF-8.
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidString {
        offset: u64,
        #[source]
        source: FromUtf8Error,
    },

    /// The stage name is not one of the registered stage kinds.
    #[error("unknown stage type '{0}'")]
    UnknownStageType(String),

    /// Nested pipelines go deeper than the configured limit.
    #[error("pipeline nesting exceeds the limit of {0} levels")]
    NestingTooDeep(usize),

    /// A value falls outside the domain of the stage's function.
    #[error("stage '{stage}' undefined for {value} (element {index})")]
    DomainError {
        stage: &'static str,
        index: usize,
        value: f64,
    },

    /// A named feature required by the map was not supplied.
    #[error("missing input '{0}'")]
    MissingInput(String),

    /// The same feature name occurs twice in a serialized map.
    #[error("duplicate input '{0}' in preprocessing map")]
    DuplicateInput(String),

    /// Inverse requested on a pipeline containing a forward-only stage.
    #[error("stage '{0}' does not support inverse application")]
    UnsupportedInverse(&'static str),
}
