//! HTTP content protocol client for tsdlink.
//!
//! This crate provides the request side of the data pipeline:
//!
//! - [`ProtocolClient`] - Schema probes, info reads and content reads
//! - [`TrustPolicy`] - Per-connection certificate validation policy
//! - [`extract_scheme`] - Schema document embedded in the `Link` header
//! - [`ServerVersion`] - Build and license document returned by info reads

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod info;
mod scheme;
mod tls;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{ClientConfig, ProtocolClient, ProtocolError, RequestMethod};
pub use info::ServerVersion;
pub use scheme::{
    END_LINK, SCHEME_HEADER, START_LINK, decode_scheme_header, encode_scheme_header,
    extract_scheme,
};
pub use tls::TrustPolicy;
