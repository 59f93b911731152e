//! Info command implementation.
//!
//! Reads the server version document and prints build and license details.

use anyhow::{Context, Result};
use tsdlink_lib::prelude::*;

use super::ConnectionArgs;

/// Show build and license information of the server.
pub(crate) async fn show_info(connection: &ConnectionArgs) -> Result<()> {
    let mut description = connection.description("")?;
    let mut client = ProtocolClient::new(connection.client_config());

    let bytes = client
        .read_info(&mut description)
        .await
        .context("Info request failed")?;
    client.close();

    let version = ServerVersion::from_slice(&bytes).context("Server sent an invalid version document")?;

    println!("Server:   {}", description.host());
    for key in ["revisionNumber", "buildNumber", "buildId", "hbaseVersion"] {
        if let Some(value) = version.build_property(key) {
            println!("{key:<16} {value}");
        }
    }
    if let Some(license) = &version.license {
        for (key, value) in license {
            println!("{key:<16} {value}");
        }
    }

    Ok(())
}
