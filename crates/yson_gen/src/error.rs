//! Error types for schema loading and generator configuration.

/// Errors raised before any row is generated.
///
/// Generation and encoding are total over a typed [`Schema`](crate::Schema),
/// so every failure surfaces while a schema or config is being built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scalar type name outside the closed type set
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The schema description does not have the expected descriptor shape
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// Generator settings out of range
    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
