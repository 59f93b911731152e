//! CLI command implementations.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tsdlink_lib::prelude::*;

pub(crate) mod info;
pub(crate) mod query;
pub(crate) mod schema;

/// Connection options shared by every command.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// Connection string: <url>[;<param>]* (e.g. "https://host:8443/api/sql;limit=100")
    #[arg(long, env = "TSDLINK_URL")]
    url: String,

    /// Login for basic authentication
    #[arg(long)]
    user: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "TSDLINK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Accept any server certificate and host name (self-signed servers only)
    #[arg(long)]
    trust: bool,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, default_value = "60")]
    timeout: u64,
}

impl ConnectionArgs {
    /// Builds the content description for `query`.
    pub(crate) fn description(&self, query: &str) -> Result<ContentDescription> {
        let description = ContentDescription::from_connection_string(&self.url, query)
            .with_context(|| format!("Invalid connection string: {}", self.url))?;
        Ok(description
            .with_credentials(self.user.as_deref(), self.password.as_deref())
            .with_trusted(self.trust))
    }

    /// Builds the protocol client configuration.
    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            ..Default::default()
        }
    }
}

/// Creates the context of the single statement a command runs.
pub(crate) fn statement_context() -> StatementContext {
    StatementContext::new(uuid::Uuid::new_v4().to_string(), 1)
}
