//! Async InfluxDB client.

use bytes::Bytes;
use reqwest::Method;
use tracing::debug;

use crate::config::ClientConfig;
use crate::data_point::{encode_points, DataPoint};
use crate::error::Error;
use crate::request::{basic_auth_value, token_auth_value, QueryOptions, RequestFactory, WriteOptions};
use crate::response::Reply;
use crate::transport::{AsyncHttp, AsyncTransport, HttpResponse};

/// A client whose operations return futures for the caller to await.
///
/// Builds exactly the same requests as [`crate::Client`]. Several requests
/// may be in flight at once through a shared reference; changing
/// credentials needs `&mut self` and therefore waits until none are. There
/// is no internal locking, no cancellation beyond dropping the future, and
/// no retry.
#[derive(Debug)]
pub struct AsyncClient<T: AsyncTransport = AsyncHttp> {
    requests: RequestFactory,
    transport: T,
}

impl AsyncClient<AsyncHttp> {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let transport = AsyncHttp::open(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: AsyncTransport> AsyncClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, Error> {
        let requests = RequestFactory::new(config)?;
        debug!(base_url = %requests.base_url(), "async client opened");
        Ok(AsyncClient {
            requests,
            transport,
        })
    }

    pub fn default_database(&self) -> &str {
        self.requests.default_database()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<(), Error> {
        self.requests.set_auth(&basic_auth_value(username, password))
    }

    pub fn set_token_auth(&mut self, token: &str) -> Result<(), Error> {
        self.requests.set_auth(&token_auth_value(token))
    }

    pub fn clear_auth(&mut self) {
        self.requests.clear_auth();
    }

    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Bytes>,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, T::Error> {
        self.transport
            .send(self.requests.build(endpoint, method, body, params))
            .await
    }

    pub async fn ping(&self) -> Result<Reply, T::Error> {
        let response = self.transport.send(self.requests.ping()).await?;
        Ok(Reply::new(response))
    }

    pub async fn query(&self, query: &str, options: &QueryOptions) -> Result<Reply, T::Error> {
        let response = self
            .transport
            .send(self.requests.query(query, options))
            .await?;
        Ok(Reply::new(response))
    }

    pub async fn write(&self, lines: &str, options: &WriteOptions) -> Result<Reply, T::Error> {
        self.send_write(Bytes::copy_from_slice(lines.as_bytes()), options)
            .await
    }

    pub async fn write_point(&self, point: &DataPoint, options: &WriteOptions) -> Result<Reply, T::Error> {
        self.send_write(Bytes::from(point.to_line_protocol()), options)
            .await
    }

    pub async fn write_points(
        &self,
        points: &[DataPoint],
        options: &WriteOptions,
    ) -> Result<Reply, T::Error> {
        self.send_write(Bytes::from(encode_points(points)), options)
            .await
    }

    pub fn close(self) {
        debug!(base_url = %self.requests.base_url(), "async client closed");
    }

    async fn send_write(&self, body: Bytes, options: &WriteOptions) -> Result<Reply, T::Error> {
        let response = self
            .transport
            .send(self.requests.write(body, options))
            .await?;
        Ok(Reply::new(response))
    }
}
