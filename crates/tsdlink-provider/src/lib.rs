//! Query execution for tsdlink.
//!
//! [`DataProvider`] drives the two exchanges of one query: a schema probe for
//! the query's predicate-free prefix, then the content fetch whose stream is
//! handed to the configured [`StoreStrategy`](tsdlink_store::StoreStrategy).

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod provider;

pub use provider::{DataProvider, WHERE_CLAUSE, probe_query};
pub use tsdlink_store::StatementContext;
