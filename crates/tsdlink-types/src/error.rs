//! Error types for tsdlink.

use thiserror::Error;

/// Result type alias for tsdlink operations.
pub type Result<T> = std::result::Result<T, TsdError>;

/// Errors that can occur while discovering metadata and fetching content.
#[derive(Error, Debug)]
pub enum TsdError {
    /// Name resolution, connect or transfer failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered an info or content read with a non-200 status.
    #[error("Unexpected HTTP status {status}")]
    ProtocolStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The schema document could not be turned into column descriptors.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The TLS trust override could not be constructed.
    #[error("Security configuration error: {0}")]
    SecurityConfig(String),

    /// The connection string is unusable.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The result sink failed to consume or replay the content.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured failures of the schema document and its transport encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("Malformed schema document: {0}")]
    Malformed(String),

    /// The top-level JSON value is not an object.
    #[error("Schema document is not a JSON object")]
    NotAnObject,

    /// The `publisher` section is missing.
    #[error("Schema document has no publisher section")]
    MissingPublisher,

    /// The publisher section carries no schema name.
    #[error("Schema publisher has no schema name")]
    MissingSchemaName,

    /// The `tableSchema` section is missing.
    #[error("Schema document has no table schema section")]
    MissingTableSchema,

    /// The table schema carries no `columns` array.
    #[error("Table schema has no columns array")]
    MissingColumns,

    /// A column entry is not a JSON object.
    #[error("Column entry at position {position} is not an object")]
    InvalidColumn {
        /// Zero-based position in the columns array.
        position: usize,
    },

    /// Two columns resolve to the same ordinal.
    #[error("Columns at positions {first} and {second} share ordinal {ordinal}")]
    DuplicateOrdinal {
        /// The shared zero-based ordinal.
        ordinal: usize,
        /// Position of the first column holding it.
        first: usize,
        /// Position of the second column holding it.
        second: usize,
    },

    /// The embedded schema header is not valid base64 or UTF-8.
    #[error("Invalid schema header encoding: {0}")]
    HeaderEncoding(String),
}

/// Errors raised while parsing a connection string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The host segment is empty.
    #[error("Connection string has no host")]
    EmptyHost,

    /// The host segment is not an absolute URL.
    #[error("Invalid host '{host}': {reason}")]
    InvalidHost {
        /// The offending host segment.
        host: String,
        /// Why it was rejected.
        reason: String,
    },
}
