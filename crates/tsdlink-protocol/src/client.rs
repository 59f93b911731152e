//! HTTP client for schema probes, info reads and content reads.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap,
    PRAGMA,
};
use reqwest::{Client, Method, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, error};
use tsdlink_types::{ContentDescription, ContentStream, SchemaError, TsdError};

use crate::{TrustPolicy, extract_scheme};

const COMPRESSION_ENCODING: &str = "gzip";
const DEFAULT_ENCODING: &str = "identity";
const KEEP_ALIVE: &str = "keep-alive";
const NO_CACHE: &str = "no-cache";
const FORM_URLENCODED_TYPE: &str = "application/x-www-form-urlencoded";
const CSV_MIME_TYPE: &str = "text/csv";

/// Configuration for the protocol client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(60)),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("tsdlink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// The three request shapes the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    /// Headers-only request that discovers the result schema.
    SchemaProbe,
    /// Read of server information.
    Info,
    /// Read of the query's row data.
    Content,
}

impl RequestMethod {
    /// Returns the HTTP verb.
    #[must_use]
    pub const fn http_method(&self) -> Method {
        match self {
            Self::SchemaProbe => Method::HEAD,
            Self::Info => Method::GET,
            Self::Content => Method::POST,
        }
    }

    /// Returns true if parameters travel in the request body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Content)
    }

    const fn accept_encoding(&self) -> &'static str {
        match self {
            Self::Content => COMPRESSION_ENCODING,
            Self::SchemaProbe | Self::Info => DEFAULT_ENCODING,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.http_method().as_str())
    }
}

/// Errors that can occur during a protocol exchange.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Connect, name resolution or transfer failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered an info or content read with a non-200 status.
    #[error("HTTP code {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The embedded schema header could not be decoded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<ProtocolError> for TsdError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Transport(e) => Self::Transport(e.to_string()),
            ProtocolError::UnexpectedStatus { status } => Self::ProtocolStatus { status },
            ProtocolError::Schema(e) => Self::Schema(e),
        }
    }
}

/// Executes protocol requests for the host a [`ContentDescription`] names.
///
/// The underlying HTTP client keeps at most one idle connection and is built
/// lazily with the trust policy of the description it serves. [`close`]
/// releases it.
///
/// [`close`]: ProtocolClient::close
#[derive(Debug)]
pub struct ProtocolClient {
    config: ClientConfig,
    client: Option<(TrustPolicy, Client)>,
}

impl ProtocolClient {
    /// Creates a protocol client with the given configuration.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Creates a protocol client with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Probes the schema of the description's query.
    ///
    /// On success the description carries the discovered schema (if the
    /// server sent one) and the reported content length.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn get_content_schema(
        &mut self,
        description: &mut ContentDescription,
    ) -> Result<(), ProtocolError> {
        self.send(description, RequestMethod::SchemaProbe)
            .await
            .map(drop)
    }

    /// Reads server information as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    pub async fn read_info(
        &mut self,
        description: &mut ContentDescription,
    ) -> Result<Bytes, ProtocolError> {
        match self.send(description, RequestMethod::Info).await? {
            Some(response) => Ok(response.bytes().await?),
            None => Ok(Bytes::new()),
        }
    }

    /// Reads the query's content as a decompressed byte stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    pub async fn read_content(
        &mut self,
        description: &mut ContentDescription,
    ) -> Result<ContentStream, ProtocolError> {
        match self.send(description, RequestMethod::Content).await? {
            Some(response) => Ok(body_stream(response)),
            None => Ok(Box::pin(futures::stream::empty())),
        }
    }

    /// Executes one request.
    ///
    /// Returns `None` for a schema probe and the response body stream
    /// otherwise. A gzip-encoded body is decompressed transparently.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or for info and content reads,
    /// if the status is not 200.
    pub async fn execute(
        &mut self,
        description: &mut ContentDescription,
        method: RequestMethod,
    ) -> Result<Option<ContentStream>, ProtocolError> {
        Ok(self.send(description, method).await?.map(body_stream))
    }

    /// Releases the HTTP client and its pooled connection.
    ///
    /// Safe to call repeatedly and when nothing was opened.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("protocol client closed");
        }
    }

    /// Returns true while an HTTP client is held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.client.is_some()
    }

    async fn send(
        &mut self,
        description: &mut ContentDescription,
        method: RequestMethod,
    ) -> Result<Option<Response>, ProtocolError> {
        let post_params = description.post_params();
        let url = request_url(description.host(), method, &post_params);
        debug!(%method, %url, "request");

        let client = self.client_for(description)?;
        let mut request = client
            .request(method.http_method(), &url)
            .header(ACCEPT_ENCODING, method.accept_encoding())
            .header(CONNECTION, KEEP_ALIVE)
            .header(CONTENT_TYPE, FORM_URLENCODED_TYPE)
            .header(CACHE_CONTROL, NO_CACHE)
            .header(PRAGMA, NO_CACHE);
        if let Some((login, password)) = description.credentials() {
            request = request.basic_auth(login, Some(password));
        }
        if method.has_body() {
            debug!(params = %post_params, "request parameters");
            request = request.header(ACCEPT, CSV_MIME_TYPE).body(post_params);
        }

        let response = request.send().await?;

        if !description.has_scheme()
            && let Some(scheme) = extract_scheme(response.headers())?
        {
            description.set_json_scheme(scheme);
        }

        // Absent for gzip bodies, which are decoded transparently
        let length = content_length(response.headers());
        debug!(status = response.status().as_u16(), ?length, "response");
        description.set_content_length(length);

        if method == RequestMethod::SchemaProbe {
            return Ok(None);
        }

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "unexpected response code");
            return Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(Some(response))
    }

    fn client_for(&mut self, description: &ContentDescription) -> Result<Client, ProtocolError> {
        let policy = TrustPolicy::for_description(description);
        if let Some((current, client)) = &self.client
            && *current == policy
        {
            return Ok(client.clone());
        }

        let client = build_client(&self.config, policy)?;
        self.client = Some((policy, client.clone()));
        Ok(client)
    }
}

/// Builds the HTTP client for one trust policy.
///
/// A trust-all client that cannot be built is logged and replaced by a client
/// with default validation.
fn build_client(config: &ClientConfig, policy: TrustPolicy) -> Result<Client, ProtocolError> {
    let base = || {
        let builder = Client::builder()
            // One connection per description
            .pool_max_idle_per_host(1)
            .tcp_nodelay(true)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true);
        match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    };

    if policy.is_trust_all() {
        match policy.apply(base()).build() {
            Ok(client) => return Ok(client),
            Err(e) => {
                let err = TsdError::SecurityConfig(e.to_string());
                error!(error = %err, "falling back to default certificate validation");
            }
        }
    }

    Ok(base().build()?)
}

/// Builds the request URL: parameters go in the query string unless the
/// method sends them in the body.
fn request_url(host: &str, method: RequestMethod, post_params: &str) -> String {
    if method.has_body() || post_params.trim().is_empty() {
        host.to_string()
    } else {
        format!("{host}?{post_params}")
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn body_stream(response: Response) -> ContentStream {
    Box::pin(
        response
            .bytes_stream()
            .map_err(|e| TsdError::Transport(e.to_string())),
    )
}
