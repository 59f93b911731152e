//! Temporary-file store.

use std::path::Path;

use async_trait::async_trait;
use futures::TryStreamExt;
use tempfile::NamedTempFile;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use tsdlink_types::ContentStream;

use crate::rows::read_csv;
use crate::{RowSet, StatementContext, StoreError, StoreStrategy, StrategyKind};

const FILE_PREFIX: &str = "tsdlink-";
const FILE_SUFFIX: &str = ".csv";

/// Spools the content stream to a temporary file that is removed on close.
#[derive(Debug)]
pub struct FileStore {
    file: Option<NamedTempFile>,
    statement_id: u32,
    max_rows: Option<u64>,
    closed: bool,
}

impl FileStore {
    /// Creates a store governed by `context`; no file exists until content
    /// is stored.
    #[must_use]
    pub fn new(context: &StatementContext) -> Self {
        Self {
            file: None,
            statement_id: context.statement_id(),
            max_rows: context.max_rows(),
            closed: false,
        }
    }

    /// Returns the spool file path while one exists.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(NamedTempFile::path)
    }

    fn spool(&self) -> Result<NamedTempFile, StoreError> {
        Ok(tempfile::Builder::new()
            .prefix(&format!("{FILE_PREFIX}{}-", self.statement_id))
            .suffix(FILE_SUFFIX)
            .tempfile()?)
    }
}

#[async_trait]
impl StoreStrategy for FileStore {
    async fn store(&mut self, mut stream: ContentStream) -> Result<u64, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        // Previous spool is removed when replaced
        let spool = self.spool()?;
        let mut writer = BufWriter::new(tokio::fs::File::from_std(spool.reopen()?));

        let mut written = 0u64;
        while let Some(chunk) = stream.try_next().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        debug!(path = %spool.path().display(), bytes = written, "content spooled to file");
        self.file = Some(spool);
        Ok(written)
    }

    async fn rows(&mut self) -> Result<RowSet, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        match &self.file {
            Some(file) => {
                let reader = tokio::fs::File::open(file.path()).await?;
                read_csv(reader, self.max_rows).await
            }
            None => Ok(RowSet::default()),
        }
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        if let Some(file) = self.file.take() {
            debug!(path = %file.path().display(), "removing spool file");
            file.close()?;
        }
        Ok(())
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::File
    }
}
