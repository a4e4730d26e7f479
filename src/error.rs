use thiserror::Error;

/// Error taxonomy for Calltrail operations.
///
/// Expected conditions (untracking an unknown function, an empty registry)
/// are not errors; they are no-ops at the call site.
#[derive(Error, Debug)]
pub enum TrackError {
    /// A host query (symbol outline, document text) returned nothing usable.
    /// Callers log this and abort the operation, leaving state unchanged.
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("state store error: {0}")]
    Store(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
