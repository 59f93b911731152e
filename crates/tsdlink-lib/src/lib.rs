//! Client library for time-series SQL endpoints.
//!
//! This is a facade crate that re-exports functionality from the tsdlink
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use tsdlink_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let query = "SELECT entity, value FROM cpu_busy WHERE entity = 'nur'";
//!     let mut provider = DataProvider::connect(
//!         "https://atsd.example.com:8443/api/sql;limit=100",
//!         query,
//!         Some("reader"),
//!         Some("secret"),
//!         StatementContext::new("conn-1", 1),
//!         ClientConfig::default(),
//!     )?;
//!
//!     provider.check_scheme(query).await?;
//!     let metadata = provider.metadata()?;
//!     provider.fetch_data(0).await?;
//!
//!     if let Some(rows) = provider.rows().await? {
//!         for row in rows.typed(metadata.columns())? {
//!             println!("{row:?}");
//!         }
//!     }
//!     provider.close().await?;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tsdlink/tsdlink/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tsdlink_types::*;

// Re-export schema handling
pub use tsdlink_metadata::{ContentMetadata, StatementType, build_metadata_list};

// Re-export the protocol client
#[cfg(feature = "protocol")]
pub use tsdlink_protocol::{
    ClientConfig, ProtocolClient, ProtocolError, RequestMethod, ServerVersion, TrustPolicy,
    decode_scheme_header, encode_scheme_header, extract_scheme,
};

// Re-export result stores
#[cfg(feature = "store")]
pub use tsdlink_store::{
    FileStore, MemoryStore, RowSet, StatementContext, StoreError, StoreStrategy, StrategyKind,
    resolve_strategy,
};

// Re-export query execution
#[cfg(feature = "provider")]
pub use tsdlink_provider::{DataProvider, probe_query};

/// Prelude module for convenient imports.
///
/// ```
/// use tsdlink_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tsdlink_types::{
        ColumnDescriptor, ConnectionString, ContentDescription, Representation, Result, SqlType,
        TsdError, Value,
    };

    pub use tsdlink_metadata::{ContentMetadata, build_metadata_list};

    #[cfg(feature = "protocol")]
    pub use tsdlink_protocol::{ClientConfig, ProtocolClient, ServerVersion};

    #[cfg(feature = "store")]
    pub use tsdlink_store::{RowSet, StatementContext, StoreStrategy, StrategyKind};

    #[cfg(feature = "provider")]
    pub use tsdlink_provider::DataProvider;
}
