//! Two-phase query execution.

use tracing::{debug, info, warn};
use tsdlink_metadata::ContentMetadata;
use tsdlink_protocol::{ClientConfig, ProtocolClient};
use tsdlink_store::{RowSet, StatementContext, StoreStrategy, resolve_strategy};
use tsdlink_types::{ContentDescription, Result};

/// Clause that starts the predicate part of a query.
pub const WHERE_CLAUSE: &str = " WHERE ";

/// Returns the text a schema probe runs: everything before the first
/// [`WHERE_CLAUSE`], or the whole query when there is none.
///
/// The match is exact in case and spacing.
#[must_use]
pub fn probe_query(query: &str) -> &str {
    query
        .split_once(WHERE_CLAUSE)
        .map_or(query, |(prefix, _)| prefix)
}

/// Executes one query: schema discovery, content fetch and hand-off to a
/// store strategy.
///
/// The provider owns its description, protocol client and store; none of them
/// is shared with other queries.
#[derive(Debug)]
pub struct DataProvider {
    description: ContentDescription,
    client: ProtocolClient,
    context: StatementContext,
    strategy: Option<Box<dyn StoreStrategy>>,
}

impl DataProvider {
    /// Creates a provider and resolves the configured store strategy.
    #[must_use]
    pub fn new(
        description: ContentDescription,
        context: StatementContext,
        config: ClientConfig,
    ) -> Self {
        let strategy = resolve_strategy(description.strategy_name(), &context);
        Self {
            description,
            client: ProtocolClient::new(config),
            context,
            strategy,
        }
    }

    /// Creates a provider from a connection string, query and optional
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid.
    pub fn connect(
        connection: &str,
        query: &str,
        login: Option<&str>,
        password: Option<&str>,
        context: StatementContext,
        config: ClientConfig,
    ) -> Result<Self> {
        let description = ContentDescription::from_connection_string(connection, query)?
            .with_credentials(login, password);
        Ok(Self::new(description, context, config))
    }

    /// Discovers the result schema of `original_query`.
    ///
    /// The probe runs the predicate-free prefix of the query. On success the
    /// description carries `original_query`, the discovered schema and the
    /// reported content length. On failure the description is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe cannot be sent or the schema header
    /// cannot be decoded.
    pub async fn check_scheme(&mut self, original_query: &str) -> Result<()> {
        let prefix = probe_query(original_query);
        debug!(query = prefix, "probing schema");

        let mut probe = self.description.for_query(prefix);
        self.client.get_content_schema(&mut probe).await?;

        let mut restored = self.description.for_query(original_query);
        restored.absorb(&probe);
        debug!(
            discovered = restored.has_scheme(),
            length = ?restored.content_length(),
            "schema probe finished"
        );
        self.description = restored;
        Ok(())
    }

    /// Fetches the query's content and stores it with the configured strategy.
    ///
    /// `max_limit` is recorded on the statement context for the store; zero
    /// means unlimited. The strategy is resolved again for every fetch, so a
    /// name changed since discovery takes effect here. Returns the number of
    /// bytes stored, or `None` when no strategy is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200, or the
    /// store cannot consume the stream. Nothing is stored on a failed request,
    /// and a store that fails mid-transfer is closed and detached.
    pub async fn fetch_data(&mut self, max_limit: u64) -> Result<Option<u64>> {
        let stream = self.client.read_content(&mut self.description).await?;

        self.context.set_max_rows(max_limit);
        if let Some(mut previous) = self.strategy.take() {
            previous.close().await?;
        }
        self.strategy = resolve_strategy(self.description.strategy_name(), &self.context);

        match self.strategy.as_mut() {
            Some(strategy) => match strategy.store(stream).await {
                Ok(stored) => {
                    info!(bytes = stored, strategy = %strategy.kind(), "content stored");
                    Ok(Some(stored))
                }
                Err(e) => {
                    warn!(error = %e, "content transfer failed, dropping store");
                    if let Some(mut failed) = self.strategy.take()
                        && let Err(close) = failed.close().await
                    {
                        warn!(error = %close, "failed to release store");
                    }
                    Err(e.into())
                }
            },
            None => {
                debug!("no store strategy, content discarded");
                Ok(None)
            }
        }
    }

    /// Replays the stored content as rows, if a strategy holds any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read back.
    pub async fn rows(&mut self) -> Result<Option<RowSet>> {
        match self.strategy.as_mut() {
            Some(strategy) => Ok(Some(strategy.rows().await?)),
            None => Ok(None),
        }
    }

    /// Builds the statement signature from the discovered schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the discovered schema is not a valid schema document.
    pub fn metadata(&self) -> Result<ContentMetadata> {
        Ok(ContentMetadata::from_description(
            &self.description,
            self.context.connection_id(),
            self.context.statement_id(),
        )?)
    }

    /// Closes the store strategy and releases the connection.
    ///
    /// Safe to call repeatedly and when no strategy is attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot release its resources.
    pub async fn close(&mut self) -> Result<()> {
        let strategy = self.strategy.take();
        self.client.close();
        if let Some(mut strategy) = strategy {
            strategy.close().await?;
        }
        Ok(())
    }

    /// Returns the content description.
    #[must_use]
    pub const fn description(&self) -> &ContentDescription {
        &self.description
    }

    /// Returns the content description for changes between phases.
    pub const fn description_mut(&mut self) -> &mut ContentDescription {
        &mut self.description
    }

    /// Returns the statement context.
    #[must_use]
    pub const fn context(&self) -> &StatementContext {
        &self.context
    }

    /// Returns the attached store strategy.
    #[must_use]
    pub fn strategy(&self) -> Option<&dyn StoreStrategy> {
        self.strategy.as_deref()
    }
}
