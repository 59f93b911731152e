//! Schema document parsing and column metadata for tsdlink.
//!
//! - [`build_metadata_list`] - JSON schema document to column descriptors
//! - [`ContentMetadata`] - Statement signature carrying the column list

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod content;

pub use builder::build_metadata_list;
pub use content::{ContentMetadata, StatementType};
