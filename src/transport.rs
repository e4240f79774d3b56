//! HTTP transport abstraction shared by the blocking and async clients.
//!
//! Request construction lives in [`crate::request`] and produces an
//! [`HttpRequest`]; a transport only moves it over the wire. The two
//! reqwest-backed transports each own one long-lived `reqwest` client,
//! opened when the InfluxDB client is constructed and released when it is
//! closed or dropped.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use std::future::Future;
use tracing::debug;

use crate::config::ClientConfig;

/// A fully built request, ready to be sent by a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// The raw response returned by a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A transport whose `send` blocks the calling thread.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

/// A transport whose `send` returns a future to be awaited by the caller.
pub trait AsyncTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

/// Blocking transport backed by [`reqwest::blocking::Client`].
///
/// Must not be opened, used or dropped from inside an async runtime; use
/// [`AsyncHttp`] there instead.
#[derive(Debug, Clone)]
pub struct BlockingHttp {
    client: reqwest::blocking::Client,
}

impl BlockingHttp {
    pub fn open(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .pool_max_idle_per_host(1)
            .timeout(config.request_timeout());
        if let Some(certificate) = config.trusted_root() {
            builder = builder.add_root_certificate(certificate.clone());
        }
        let client = builder.build()?;
        debug!(base_url = %config.base_url_string(), "opened blocking transport");
        Ok(Self { client })
    }
}

impl Transport for BlockingHttp {
    type Error = reqwest::Error;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        debug!(method = %request.method, path = request.url.path(), "sending request");
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        debug!(status = status.as_u16(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async transport backed by [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct AsyncHttp {
    client: reqwest::Client,
}

impl AsyncHttp {
    pub fn open(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(1);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(certificate) = config.trusted_root() {
            builder = builder.add_root_certificate(certificate.clone());
        }
        let client = builder.build()?;
        debug!(base_url = %config.base_url_string(), "opened async transport");
        Ok(Self { client })
    }
}

impl AsyncTransport for AsyncHttp {
    type Error = reqwest::Error;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        debug!(method = %request.method, path = request.url.path(), "sending request");
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
