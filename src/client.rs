//! Blocking InfluxDB client.

use bytes::Bytes;
use reqwest::Method;
use tracing::debug;

use crate::config::ClientConfig;
use crate::data_point::{encode_points, DataPoint};
use crate::error::Error;
use crate::request::{basic_auth_value, token_auth_value, QueryOptions, RequestFactory, WriteOptions};
use crate::response::Reply;
use crate::transport::{BlockingHttp, HttpResponse, Transport};

/// A client whose operations block the calling thread until the HTTP
/// exchange completes.
///
/// The transport is opened in the constructor and reused for every request
/// until [`Client::close`] consumes the client. Requests borrow the client
/// immutably, while changing credentials needs `&mut self`, so sharing one
/// client between threads that also change auth requires an external lock
/// (or one client per thread). Nothing is retried.
#[derive(Debug)]
pub struct Client<T: Transport = BlockingHttp> {
    requests: RequestFactory,
    transport: T,
}

impl Client<BlockingHttp> {
    /// Opens a reqwest-backed blocking client. Must not be called from
    /// inside an async runtime.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let transport = BlockingHttp::open(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, Error> {
        let requests = RequestFactory::new(config)?;
        debug!(base_url = %requests.base_url(), "client opened");
        Ok(Client {
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

    /// Sends `Authorization: Basic ...` on every following request.
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<(), Error> {
        self.requests.set_auth(&basic_auth_value(username, password))
    }

    /// Sends `Authorization: Token ...` on every following request.
    pub fn set_token_auth(&mut self, token: &str) -> Result<(), Error> {
        self.requests.set_auth(&token_auth_value(token))
    }

    pub fn clear_auth(&mut self) {
        self.requests.clear_auth();
    }

    /// Sends an arbitrary request and returns the raw response. Non-2xx
    /// statuses are not errors; transport failures are returned unchanged.
    pub fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Bytes>,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, T::Error> {
        self.transport
            .send(self.requests.build(endpoint, method, body, params))
    }

    pub fn ping(&self) -> Result<Reply, T::Error> {
        self.transport.send(self.requests.ping()).map(Reply::new)
    }

    pub fn query(&self, query: &str, options: &QueryOptions) -> Result<Reply, T::Error> {
        self.transport
            .send(self.requests.query(query, options))
            .map(Reply::new)
    }

    /// Writes raw line protocol text.
    pub fn write(&self, lines: &str, options: &WriteOptions) -> Result<Reply, T::Error> {
        self.send_write(Bytes::copy_from_slice(lines.as_bytes()), options)
    }

    pub fn write_point(&self, point: &DataPoint, options: &WriteOptions) -> Result<Reply, T::Error> {
        self.send_write(Bytes::from(point.to_line_protocol()), options)
    }

    /// Writes all points in one request, one line each.
    pub fn write_points(&self, points: &[DataPoint], options: &WriteOptions) -> Result<Reply, T::Error> {
        self.send_write(Bytes::from(encode_points(points)), options)
    }

    /// Releases the transport. The client cannot be used afterwards.
    pub fn close(self) {
        debug!(base_url = %self.requests.base_url(), "client closed");
    }

    fn send_write(&self, body: Bytes, options: &WriteOptions) -> Result<Reply, T::Error> {
        self.transport
            .send(self.requests.write(body, options))
            .map(Reply::new)
    }
}
