//! Query command implementation.
//!
//! Runs the schema probe and the content fetch, then prints the stored rows.

use anyhow::{Context, Result};
use tracing::warn;
use tsdlink_lib::prelude::*;

use super::{ConnectionArgs, statement_context};
use crate::display::{Format, print_rows, spinner};

/// Run a query and print its rows in the requested format.
pub(crate) async fn run_query(
    query: &str,
    connection: &ConnectionArgs,
    strategy: &str,
    max_rows: u64,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let description = connection.description(query)?.with_strategy_name(strategy);
    let mut provider = DataProvider::new(
        description,
        statement_context(),
        connection.client_config(),
    );

    let progress = spinner(quiet, "Discovering schema")?;
    let result = fetch(&mut provider, query, max_rows, &progress).await;
    progress.finish_and_clear();

    let outcome = match result {
        Ok((metadata, Some(rows))) => print_rows(&rows, metadata.columns(), format),
        Ok((_, None)) => {
            warn!(strategy, "no store strategy, nothing to print");
            Ok(())
        }
        Err(e) => Err(e),
    };

    provider.close().await?;
    outcome
}

async fn fetch(
    provider: &mut DataProvider,
    query: &str,
    max_rows: u64,
    progress: &indicatif::ProgressBar,
) -> Result<(ContentMetadata, Option<RowSet>)> {
    provider
        .check_scheme(query)
        .await
        .context("Schema probe failed")?;
    let metadata = provider
        .metadata()
        .context("Server sent an invalid schema")?;

    progress.set_message("Fetching content");
    provider
        .fetch_data(max_rows)
        .await
        .context("Content fetch failed")?;

    let rows = provider.rows().await.context("Stored content is not CSV")?;
    Ok((metadata, rows))
}
