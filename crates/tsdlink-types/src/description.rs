//! Connection string parsing and the per-query content description.

use std::fmt;

use url::{Url, form_urlencoded};

use crate::ConnectionError;

/// Separator between the host and the raw connection parameters.
pub const PARAM_SEPARATOR: char = ';';

/// Name of the request parameter that carries the SQL text.
pub const QUERY_PARAM: &str = "q";

/// Store strategy used when none is configured.
pub const DEFAULT_STRATEGY: &str = "memory";

/// A parsed `<host>[;<param>]*` connection string.
///
/// ```
/// use tsdlink_types::ConnectionString;
///
/// let conn = ConnectionString::parse("https://tsd.local:8443/api/sql;trim=false").unwrap();
/// assert_eq!(conn.host(), "https://tsd.local:8443/api/sql");
/// assert_eq!(conn.params(), ["trim=false"]);
/// assert!(conn.is_secure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    host: String,
    params: Vec<String>,
    secure: bool,
}

impl ConnectionString {
    /// Parses a connection string.
    ///
    /// The first segment must be an absolute `http` or `https` URL. Every other
    /// non-empty segment is kept verbatim as a server parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the host segment is empty or not a usable URL.
    pub fn parse(value: &str) -> Result<Self, ConnectionError> {
        let mut segments = value.split(PARAM_SEPARATOR);
        let host = segments.next().map(str::trim).unwrap_or_default();
        if host.is_empty() {
            return Err(ConnectionError::EmptyHost);
        }

        let url = Url::parse(host).map_err(|e| ConnectionError::InvalidHost {
            host: host.to_string(),
            reason: e.to_string(),
        })?;
        let secure = match url.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(ConnectionError::InvalidHost {
                    host: host.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                });
            }
        };

        let params = segments
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: host.to_string(),
            params,
            secure,
        })
    }

    /// Returns the base URL of the server.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the raw parameters following the host.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns true if the host uses `https`.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }
}

/// Everything the protocol client needs to talk to the server about one query.
///
/// The discovered schema text is write-once: it moves from absent to present a
/// single time and is never cleared or replaced afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentDescription {
    host: String,
    query: String,
    login: Option<String>,
    password: Option<String>,
    params: Vec<String>,
    ssl: bool,
    trusted: bool,
    strategy_name: String,
    json_scheme: Option<String>,
    content_length: Option<u64>,
}

impl ContentDescription {
    /// Creates a description for `query` against the given connection.
    #[must_use]
    pub fn new(connection: ConnectionString, query: impl Into<String>) -> Self {
        Self {
            ssl: connection.secure,
            host: connection.host,
            params: connection.params,
            query: query.into(),
            login: None,
            password: None,
            trusted: false,
            strategy_name: DEFAULT_STRATEGY.to_string(),
            json_scheme: None,
            content_length: None,
        }
    }

    /// Parses `connection` and creates a description for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid.
    pub fn from_connection_string(
        connection: &str,
        query: impl Into<String>,
    ) -> Result<Self, ConnectionError> {
        Ok(Self::new(ConnectionString::parse(connection)?, query))
    }

    /// Sets the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        login: Option<impl Into<String>>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.login = login.map(Into::into);
        self.password = password.map(Into::into);
        self
    }

    /// Opts in to accepting any server certificate and host name.
    ///
    /// Only meant for development servers and self-signed certificates.
    #[must_use]
    pub const fn with_trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Sets the name of the store strategy that receives the content.
    #[must_use]
    pub fn with_strategy_name(mut self, name: impl Into<String>) -> Self {
        self.strategy_name = name.into();
        self
    }

    /// Returns a copy of this description carrying a different query text.
    #[must_use]
    pub fn for_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    /// Copies what a request against `other` discovered into this description.
    ///
    /// The schema text is only taken if this description has none yet.
    pub fn absorb(&mut self, other: &Self) {
        if let Some(scheme) = &other.json_scheme {
            self.set_json_scheme(scheme.clone());
        }
        self.content_length = other.content_length;
    }

    /// Returns the server base URL.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the current SQL text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the raw connection parameters.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns the login, if any.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Returns the credentials when both login and password are non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.login.as_deref(), self.password.as_deref()) {
            (Some(login), Some(password)) if !login.is_empty() && !password.is_empty() => {
                Some((login, password))
            }
            _ => None,
        }
    }

    /// Returns true if the endpoint uses `https`.
    #[must_use]
    pub const fn is_ssl(&self) -> bool {
        self.ssl
    }

    /// Returns true if certificate and host name checks are overridden.
    #[must_use]
    pub const fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Returns the configured store strategy name.
    #[must_use]
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Changes the store strategy used by the next fetch.
    pub fn set_strategy_name(&mut self, name: impl Into<String>) {
        self.strategy_name = name.into();
    }

    /// Returns the discovered schema document, if any.
    #[must_use]
    pub fn json_scheme(&self) -> Option<&str> {
        self.json_scheme.as_deref()
    }

    /// Returns true once a schema document has been discovered.
    #[must_use]
    pub const fn has_scheme(&self) -> bool {
        self.json_scheme.is_some()
    }

    /// Stores the discovered schema document.
    ///
    /// Returns false, leaving the description untouched, if a schema was
    /// already recorded or `scheme` is empty.
    pub fn set_json_scheme(&mut self, scheme: String) -> bool {
        if self.json_scheme.is_some() || scheme.is_empty() {
            return false;
        }
        self.json_scheme = Some(scheme);
        true
    }

    /// Returns the content length reported by the most recent response.
    ///
    /// This is `None` for gzip-encoded content reads: the body is decoded on
    /// the fly and the encoded length is dropped with the `Content-Length`
    /// header, while the decoded length is only known once the stream is
    /// drained.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Records the content length of the most recent response.
    pub const fn set_content_length(&mut self, length: Option<u64>) {
        self.content_length = length;
    }

    /// Builds the urlencoded request payload.
    ///
    /// The query goes first as `q=<encoded>`, followed by each raw connection
    /// parameter unchanged.
    #[must_use]
    pub fn post_params(&self) -> String {
        let mut out = String::new();
        if !self.query.is_empty() {
            out.push_str(QUERY_PARAM);
            out.push('=');
            out.extend(form_urlencoded::byte_serialize(self.query.as_bytes()));
        }
        for param in &self.params {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(param);
        }
        out
    }
}

impl fmt::Debug for ContentDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDescription")
            .field("host", &self.host)
            .field("query", &self.query)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("params", &self.params)
            .field("ssl", &self.ssl)
            .field("trusted", &self.trusted)
            .field("strategy_name", &self.strategy_name)
            .field("has_scheme", &self.json_scheme.is_some())
            .field("content_length", &self.content_length)
            .finish()
    }
}
