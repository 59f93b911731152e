//! Result sinks for tsdlink content streams.
//!
//! A [`StoreStrategy`] drains the content stream of one fetch and replays it
//! as CSV rows:
//!
//! - [`MemoryStore`] - Buffers the content in memory
//! - [`FileStore`] - Spools the content to a temporary file
//!
//! Strategies are selected by name with [`resolve_strategy`].

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod file;
mod memory;
mod rows;
mod strategy;

pub use context::StatementContext;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use rows::RowSet;
pub use strategy::{StoreError, StoreStrategy, StrategyKind, resolve_strategy};
