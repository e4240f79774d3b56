//! Client for the InfluxDB 1.x HTTP API.
//!
//! [`DataPoint`] encodes one measurement as a line of line protocol.
//! [`Client`] (blocking) and [`AsyncClient`] send `ping`, `write`, `query`
//! and arbitrary requests to one server and return the raw response along
//! with its [`InfluxStatus`]. Rejections by the server are statuses, not
//! errors; transport failures are returned as the transport's own error.
//!
//! ```no_run
//! use influxdb_http_client::{Client, ClientConfig, DataPoint, WriteOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(&ClientConfig::new("localhost", 8086).database("telemetry"))?;
//! let point = DataPoint::new("cpu")
//!     .with_tag("host", "a")
//!     .with_field("usage", 0.5)
//!     .with_timestamp(1577836800000000000);
//! let reply = client.write_point(&point, &WriteOptions::default())?;
//! println!("{}", reply.status);
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod async_client;
pub mod client;
pub mod config;
pub mod data_point;
pub mod error;
pub mod request;
pub mod response;
pub mod status;
pub mod transport;

#[cfg(test)]
mod test_util;

pub use crate::async_client::AsyncClient;
pub use crate::client::Client;
pub use crate::config::ClientConfig;
pub use crate::data_point::{encode_points, DataPoint, FieldValue, Precision};
pub use crate::error::Error;
pub use crate::request::{QueryMethod, QueryOptions, WriteOptions};
pub use crate::response::{QueryResults, Reply, Series, StatementResult};
pub use crate::status::{classify_status, InfluxStatus};
pub use crate::transport::{
    AsyncHttp, AsyncTransport, BlockingHttp, HttpRequest, HttpResponse, Transport,
};
