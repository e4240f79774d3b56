use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::Error;
use crate::status::InfluxStatus;
use crate::transport::HttpResponse;

impl HttpResponse {
    pub fn influx_status(&self) -> InfluxStatus {
        InfluxStatus::from(self.status)
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes a non-chunked `/query` response body.
    pub fn query_results(&self) -> Result<QueryResults, Error> {
        self.json()
    }

    /// Decodes a chunked `/query` response body: one JSON document per line.
    pub fn query_result_chunks(&self) -> Result<Vec<QueryResults>, Error> {
        self.text()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }
}

/// Result of a high-level operation: the raw response and its
/// classification.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: InfluxStatus,
    pub response: HttpResponse,
}

impl Reply {
    pub fn new(response: HttpResponse) -> Self {
        Reply {
            status: response.influx_status(),
            response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl From<HttpResponse> for Reply {
    fn from(response: HttpResponse) -> Self {
        Reply::new(response)
    }
}

/// Body of a `/query` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResults {
    #[serde(default)]
    pub results: Vec<StatementResult>,
    /// Request-level failure, e.g. a query that does not parse.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub statement_id: u64,
    #[serde(default)]
    pub series: Vec<Series>,
    pub error: Option<String>,
    /// Set on chunked responses while more chunks for the statement follow.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Series {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub partial: bool,
}

impl QueryResults {
    /// The first error reported by the server, request- or statement-level.
    pub fn first_error(&self) -> Option<&str> {
        self.error.as_deref().or_else(|| {
            self.results
                .iter()
                .find_map(|result| result.error.as_deref())
        })
    }
}

impl Series {
    /// The values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&serde_json::Value>> {
        let index = self.columns.iter().position(|column| column == name)?;
        Some(self.values.iter().filter_map(|row| row.get(index)).collect())
    }
}
