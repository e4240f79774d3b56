//! Transport-independent request construction.
//!
//! Both clients hold a [`RequestFactory`] and differ only in how they hand
//! the resulting [`HttpRequest`] to their transport.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Url};

use crate::config::ClientConfig;
use crate::data_point::Precision;
use crate::error::Error;
use crate::transport::HttpRequest;

pub const PING_ENDPOINT: &str = "/ping";
pub const QUERY_ENDPOINT: &str = "/query";
pub const WRITE_ENDPOINT: &str = "/write";

/// HTTP method used for `/query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    Get,
    Post,
}

impl QueryMethod {
    /// Picks GET for queries that read (`SELECT ...`, `SHOW ...`) and POST
    /// for everything else.
    ///
    /// This is a prefix match on the query text, so a read that starts with
    /// anything else (a comment, `EXPLAIN`, a multi-statement string that
    /// begins with a write) is sent as POST. Set [`QueryOptions::method`]
    /// to override it.
    pub fn for_query(query: &str) -> Self {
        let lowered = query.trim_start().to_lowercase();
        if lowered.starts_with("select") || lowered.starts_with("show") {
            QueryMethod::Get
        } else {
            QueryMethod::Post
        }
    }

    fn http_method(self) -> Method {
        match self {
            QueryMethod::Get => Method::GET,
            QueryMethod::Post => Method::POST,
        }
    }
}

/// Per-call settings for `/query`.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Overrides the client's default database.
    pub database: Option<String>,
    pub retention_policy: Option<String>,
    /// Ask the server to stream results in chunks.
    pub chunked: bool,
    /// Points per chunk; only sent when `chunked` is set.
    pub chunk_size: Option<usize>,
    pub epoch: Precision,
    pub pretty: bool,
    /// Overrides the method picked by [`QueryMethod::for_query`].
    pub method: Option<QueryMethod>,
}

impl QueryOptions {
    pub fn on_database(database: impl Into<String>) -> Self {
        QueryOptions {
            database: Some(database.into()),
            ..Default::default()
        }
    }
}

/// Per-call settings for `/write`.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Overrides the client's default database.
    pub database: Option<String>,
    pub retention_policy: Option<String>,
    /// Precision of the timestamps in the body. The server assumes
    /// nanoseconds when unset.
    pub precision: Option<Precision>,
}

impl WriteOptions {
    pub fn on_database(database: impl Into<String>) -> Self {
        WriteOptions {
            database: Some(database.into()),
            ..Default::default()
        }
    }
}

pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

pub fn token_auth_value(token: &str) -> String {
    format!("Token {}", token)
}

fn auth_header(value: &str) -> Result<Option<HeaderValue>, Error> {
    if value.is_empty() {
        return Ok(None);
    }
    let mut header = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
        key: "authorization",
        value: "<redacted>".to_string(),
    })?;
    header.set_sensitive(true);
    Ok(Some(header))
}

/// Builds requests against one server: base URL, default database and the
/// current `Authorization` value.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    base_url: Url,
    database: String,
    auth: Option<HeaderValue>,
}

impl RequestFactory {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url_string())?;
        Ok(RequestFactory {
            base_url,
            database: config.default_database().to_string(),
            auth: auth_header(config.auth_value())?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_database(&self) -> &str {
        &self.database
    }

    pub fn has_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// Replaces the `Authorization` value; an empty string removes it.
    pub fn set_auth(&mut self, value: &str) -> Result<(), Error> {
        self.auth = auth_header(value)?;
        Ok(())
    }

    pub fn clear_auth(&mut self) {
        self.auth = None;
    }

    /// Builds a request for `endpoint` with an ordered list of query
    /// parameters. Headers are created fresh for every request.
    pub fn build(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Bytes>,
        params: &[(&str, &str)],
    ) -> HttpRequest {
        let mut url = self.base_url.clone();
        url.set_path(endpoint);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let mut headers = HeaderMap::new();
        if let Some(auth) = &self.auth {
            headers.insert(AUTHORIZATION, auth.clone());
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn ping(&self) -> HttpRequest {
        self.build(PING_ENDPOINT, Method::GET, None, &[])
    }

    #[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
    pub fn query(&self, query: &str, options: &QueryOptions) -> HttpRequest {
        let chunk_size = options.chunk_size.map(|size| size.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("q", query),
            ("epoch", options.epoch.as_str()),
            ("pretty", if options.pretty { "true" } else { "false" }),
        ];
        if options.chunked {
            params.push(("chunked", "true"));
            if let Some(chunk_size) = chunk_size.as_deref() {
                params.push(("chunk_size", chunk_size));
            }
        }
        if let Some(database) = self.resolve_database(options.database.as_deref()) {
            params.push(("db", database));
        }
        if let Some(retention_policy) = options.retention_policy.as_deref() {
            params.push(("rp", retention_policy));
        }

        let method = options
            .method
            .unwrap_or_else(|| QueryMethod::for_query(query));
        self.build(QUERY_ENDPOINT, method.http_method(), None, &params)
    }

    #[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
    pub fn write(&self, lines: impl Into<Bytes>, options: &WriteOptions) -> HttpRequest {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(database) = self.resolve_database(options.database.as_deref()) {
            params.push(("db", database));
        }
        if let Some(retention_policy) = options.retention_policy.as_deref() {
            params.push(("rp", retention_policy));
        }
        if let Some(precision) = options.precision {
            params.push(("precision", precision.as_str()));
        }

        self.build(WRITE_ENDPOINT, Method::POST, Some(lines.into()), &params)
    }

    /// The per-call override if non-empty, else the default if non-empty.
    fn resolve_database<'a>(&'a self, database: Option<&'a str>) -> Option<&'a str> {
        match database {
            Some(database) if !database.is_empty() => Some(database),
            _ if !self.database.is_empty() => Some(self.database.as_str()),
            _ => None,
        }
    }
}
