//! Core types for the tsdlink time-series SQL client.
//!
//! This crate provides the data structures shared by the other crates:
//!
//! - [`ConnectionString`] - Parsed `<host>[;<param>]*` connection string
//! - [`ContentDescription`] - Everything one query exchange needs to know
//! - [`ColumnDescriptor`] - Relational metadata of a result column
//! - [`Value`] - A typed cell decoded from CSV text
//! - [`ContentStream`] - Streaming response body handed to result sinks

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod column;
mod description;
mod error;
mod value;

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;

pub use column::{ColumnDescriptor, ColumnType, DEFAULT_CATALOG_NAME, Representation, SqlType};
pub use description::{
    ConnectionString, ContentDescription, DEFAULT_STRATEGY, PARAM_SEPARATOR, QUERY_PARAM,
};
pub use error::{ConnectionError, Result, SchemaError, TsdError};
pub use value::{Value, ValueError};

/// A response body delivered chunk by chunk, already decompressed.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;
