//! Store strategy abstraction and name-based selection.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use tsdlink_types::{ContentStream, TsdError};

use crate::{FileStore, MemoryStore, RowSet, StatementContext};

/// Errors that can occur while storing or replaying content.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unknown strategy name.
    #[error("Unknown store strategy: {0}")]
    UnknownStrategy(String),

    /// The content stream failed mid-transfer.
    #[error("Content stream failed: {0}")]
    Stream(#[from] TsdError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    /// The strategy was already closed.
    #[error("Store is closed")]
    Closed,
}

impl From<StoreError> for TsdError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Stream(e) => e,
            StoreError::Io(e) => Self::Io(e),
            other => Self::Store(other.to_string()),
        }
    }
}

/// A result sink: drains a content stream and replays it as rows.
#[async_trait]
pub trait StoreStrategy: Send + std::fmt::Debug {
    /// Drains `stream` into the store, replacing anything stored before.
    ///
    /// Returns the number of bytes stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the store cannot be written.
    async fn store(&mut self, stream: ContentStream) -> Result<u64, StoreError>;

    /// Decodes the stored CSV content into rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read back or is not CSV.
    async fn rows(&mut self) -> Result<RowSet, StoreError>;

    /// Releases everything the store holds. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if backing resources cannot be released.
    async fn close(&mut self) -> Result<(), StoreError>;

    /// Returns the strategy kind.
    fn kind(&self) -> StrategyKind;
}

/// Available store strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrategyKind {
    /// Buffer the content in memory.
    #[default]
    Memory,
    /// Spool the content to a temporary file.
    File,
}

impl StrategyKind {
    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }

    /// Returns all available strategies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Memory, Self::File]
    }

    /// Creates a fresh store of this kind for one fetch.
    #[must_use]
    pub fn create(&self, context: &StatementContext) -> Box<dyn StoreStrategy> {
        match self {
            Self::Memory => Box::new(MemoryStore::new(context)),
            Self::File => Box::new(FileStore::new(context)),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "spool" => Ok(Self::File),
            _ => Err(StoreError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Resolves a configured strategy name into a fresh store.
///
/// An empty name or `none` resolves to no store; so does an unknown name, which
/// is logged.
#[must_use]
pub fn resolve_strategy(name: &str, context: &StatementContext) -> Option<Box<dyn StoreStrategy>> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        debug!("no store strategy configured");
        return None;
    }
    match name.parse::<StrategyKind>() {
        Ok(kind) => {
            debug!(strategy = %kind, statement = context.statement_id(), "store strategy resolved");
            Some(kind.create(context))
        }
        Err(e) => {
            warn!(error = %e, "content will not be stored");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("memory".parse::<StrategyKind>().unwrap(), StrategyKind::Memory);
        assert_eq!(" FILE ".parse::<StrategyKind>().unwrap(), StrategyKind::File);
        assert!(matches!(
            "stream".parse::<StrategyKind>(),
            Err(StoreError::UnknownStrategy(name)) if name == "stream"
        ));
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in StrategyKind::all() {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_resolve_strategy() {
        let context = StatementContext::default();
        assert_eq!(
            resolve_strategy("file", &context).map(|s| s.kind()),
            Some(StrategyKind::File)
        );
        assert_eq!(
            resolve_strategy("memory", &context).map(|s| s.kind()),
            Some(StrategyKind::Memory)
        );
        assert!(resolve_strategy("", &context).is_none());
        assert!(resolve_strategy("none", &context).is_none());
        assert!(resolve_strategy("bogus", &context).is_none());
    }

    #[test]
    fn test_store_error_into_tsd_error() {
        let err: TsdError = StoreError::Closed.into();
        assert!(matches!(err, TsdError::Store(_)));

        let err: TsdError = StoreError::Stream(TsdError::ProtocolStatus { status: 500 }).into();
        assert!(matches!(err, TsdError::ProtocolStatus { status: 500 }));
    }
}
