use crate::error::Error;
use chrono::{DateTime, Utc};
use log::trace;
use std::collections::BTreeMap;
use std::time::Instant;

/// Time resolution used for point timestamps, the `precision` parameter
/// of `/write` and the `epoch` parameter of `/query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    #[default]
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl Precision {
    /// The value the server expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Nanoseconds => "ns",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
            Precision::Minutes => "m",
            Precision::Hours => "h",
        }
    }

    /// Converts `time` into an integer timestamp at this precision.
    ///
    /// Returns `None` only for nanosecond timestamps outside the range an
    /// `i64` can hold (roughly years 1677 to 2262).
    pub fn timestamp_of(&self, time: &DateTime<Utc>) -> Option<i64> {
        match self {
            Precision::Nanoseconds => time.timestamp_nanos_opt(),
            Precision::Microseconds => Some(time.timestamp_micros()),
            Precision::Milliseconds => Some(time.timestamp_millis()),
            Precision::Seconds => Some(time.timestamp()),
            // Floor, so times before the epoch round down like the rest.
            Precision::Minutes => Some(time.timestamp().div_euclid(60)),
            Precision::Hours => Some(time.timestamp().div_euclid(3600)),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Precision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "ns" => Ok(Precision::Nanoseconds),
            "u" | "us" => Ok(Precision::Microseconds),
            "ms" => Ok(Precision::Milliseconds),
            "s" => Ok(Precision::Seconds),
            "m" => Ok(Precision::Minutes),
            "h" => Ok(Precision::Hours),
            other => Err(Error::InvalidConfig {
                key: "precision",
                value: other.to_string(),
            }),
        }
    }
}

/// The value of one field, rendered with its line protocol type marker.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    Boolean(bool),
}

impl std::fmt::Display for FieldValue {
    // Renders the value the way it appears on the right of `key=` in a line.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldValue::String(v) => write!(f, "\"{}\"", v),
            FieldValue::Integer(v) => write!(f, "{}i", v),
            FieldValue::UInteger(v) => write!(f, "{}u", v),
            // Debug keeps the fractional part, so 1.0 stays `1.0` rather than `1`.
            FieldValue::Float(v) => write!(f, "{:?}", v),
            FieldValue::Boolean(true) => f.write_str("t"),
            FieldValue::Boolean(false) => f.write_str("f"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::UInteger(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInteger(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// A single measurement event: a name, indexed tags, valued fields and an
/// optional timestamp.
///
/// Tags and fields are kept sorted by key so that encoding is
/// deterministic. Nothing is escaped: keys, tag values and the measurement
/// name must already be valid line protocol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp: i64,
}

impl DataPoint {
    pub fn new(measurement: impl Into<String>) -> Self {
        DataPoint {
            measurement: measurement.into(),
            ..Default::default()
        }
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// The timestamp, `0` when unset.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_measurement(&mut self, measurement: impl Into<String>) -> &mut Self {
        self.measurement = measurement.into();
        self
    }

    /// Sets a tag, replacing any previous value for `name`.
    pub fn add_tag(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    /// Sets a field, replacing any previous value for `name`.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the timestamp. `0` means "let the server assign one".
    pub fn set_timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the timestamp from a wall-clock time at the given precision.
    /// The precision must match the one the point is written with.
    pub fn set_time(&mut self, time: DateTime<Utc>, precision: Precision) -> Result<&mut Self, Error> {
        let timestamp = precision
            .timestamp_of(&time)
            .ok_or(Error::TimestampOutOfRange(time))?;
        Ok(self.set_timestamp(timestamp))
    }

    pub fn clear_timestamp(&mut self) -> &mut Self {
        self.timestamp = 0;
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_tag(name, value);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_field(name, value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Encodes the point as one line of line protocol:
    /// `measurement[,tag=value...] field=value[,field=value...][ timestamp]`.
    ///
    /// A point without fields still gets the separating space; the server
    /// rejects such a line, which is left for the caller to avoid.
    pub fn to_line_protocol(&self) -> String {
        let mut line = self.measurement.clone();
        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }

        line.push(' ');
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        line.push_str(&fields.join(","));

        if self.timestamp != 0 {
            line.push(' ');
            line.push_str(&self.timestamp.to_string());
        }
        line
    }
}

impl std::fmt::Display for DataPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_line_protocol())
    }
}

/// Encodes a batch of points, one line each, joined with `\n`.
#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn encode_points(points: &[DataPoint]) -> String {
    let function_start = Instant::now();
    let lines: Vec<String> = points.iter().map(DataPoint::to_line_protocol).collect();
    let body = lines.join("\n");
    trace!(
        "encode_points duration for {} points: {:?}",
        points.len(),
        function_start.elapsed()
    );
    body
}
