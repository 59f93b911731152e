//! Schema command implementation.
//!
//! Probes the result schema of a query and prints its columns.

use anyhow::{Context, Result};
use tsdlink_lib::prelude::*;

use super::{ConnectionArgs, statement_context};
use crate::display::{print_columns, spinner};

/// Discover and print the columns a query produces.
pub(crate) async fn show_schema(query: &str, connection: &ConnectionArgs, quiet: bool) -> Result<()> {
    let description = connection.description(query)?.with_strategy_name("none");
    let mut provider = DataProvider::new(
        description,
        statement_context(),
        connection.client_config(),
    );

    let progress = spinner(quiet, "Probing schema")?;
    let probed = provider.check_scheme(query).await;
    progress.finish_and_clear();
    probed.context("Schema probe failed")?;

    let metadata = provider.metadata().context("Server sent an invalid schema")?;
    provider.close().await?;

    if metadata.columns().is_empty() {
        println!("The server did not describe any columns for this query.");
    } else {
        print_columns(&metadata);
    }

    Ok(())
}
