use thiserror::Error;

/// Unified error type for the schemasketch library.
#[derive(Error, Debug)]
pub enum Error {
    /// The schema document is malformed or uses an unsupported construct.
    #[error("Schema Error: {0}")]
    SchemaError(String),

    /// A `$ref` could not be resolved to a concrete sub-schema.
    #[error("Reference Error: {reference}: {reason}")]
    ReferenceError { reference: String, reason: String },

    /// A literal (example, default, enum member) cannot be represented as an example value.
    #[error("Literal Error: {0}")]
    LiteralError(String),

    /// A `pattern` keyword could not be turned into a string generator.
    #[error("Pattern Error: {pattern}: {reason}")]
    PatternError { pattern: String, reason: String },

    /// Traversal went deeper than the configured limit.
    #[error("Maximum traversal depth ({0}) exceeded")]
    DepthExceeded(usize),
}

/// A specialized `Result` type for schemasketch operations.
pub type Result<T> = std::result::Result<T, Error>;
