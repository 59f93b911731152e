//! In-memory store.

use async_trait::async_trait;
use bytes::BytesMut;
use futures::TryStreamExt;
use tracing::debug;
use tsdlink_types::ContentStream;

use crate::rows::read_csv;
use crate::{RowSet, StatementContext, StoreError, StoreStrategy, StrategyKind};

/// Buffers the whole content stream in memory.
#[derive(Debug)]
pub struct MemoryStore {
    buffer: BytesMut,
    max_rows: Option<u64>,
    closed: bool,
}

impl MemoryStore {
    /// Creates an empty store governed by `context`.
    #[must_use]
    pub fn new(context: &StatementContext) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_rows: context.max_rows(),
            closed: false,
        }
    }

    /// Returns the number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[async_trait]
impl StoreStrategy for MemoryStore {
    async fn store(&mut self, mut stream: ContentStream) -> Result<u64, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        self.buffer.clear();
        loop {
            match stream.try_next().await {
                Ok(Some(chunk)) => self.buffer.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    // Partial content is never replayed
                    self.buffer.clear();
                    return Err(e.into());
                }
            }
        }
        debug!(bytes = self.buffer.len(), "content buffered in memory");
        Ok(self.buffer.len() as u64)
    }

    async fn rows(&mut self) -> Result<RowSet, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        read_csv(&self.buffer[..], self.max_rows).await
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.buffer = BytesMut::new();
        }
        Ok(())
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Memory
    }
}
