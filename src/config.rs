use crate::error::Error;
use crate::request::{basic_auth_value, token_auth_value};
use log::trace;
use std::time::{Duration, Instant};

pub const DEFAULT_PORT: u16 = 8086;

/// Connection settings for a client.
///
/// The transport is built from this once, when the client is constructed;
/// changing a config afterwards has no effect on existing clients.
#[derive(Clone)]
pub struct ClientConfig {
    host: String,
    port: u16,
    ssl: bool,
    database: String,
    timeout: Option<Duration>,
    root_certificate: Option<reqwest::Certificate>,
    auth: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ssl", &self.ssl)
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .field("root_certificate", &self.root_certificate.is_some())
            .field("auth", &!self.auth.is_empty())
            .finish()
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ClientConfig {
            host: host.into(),
            port,
            ssl: false,
            database: String::new(),
            timeout: None,
            root_certificate: None,
            auth: String::new(),
        }
    }

    pub fn ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Default database for `write` and `query` when no override is given.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Timeout applied by the transport to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Extra trusted root for TLS, e.g. a self-signed server certificate.
    /// Implies `ssl(true)`.
    pub fn root_certificate(mut self, certificate: reqwest::Certificate) -> Self {
        self.root_certificate = Some(certificate);
        self.ssl = true;
        self
    }

    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = basic_auth_value(username, password);
        self
    }

    pub fn token_auth(mut self, token: &str) -> Self {
        self.auth = token_auth_value(token);
        self
    }

    pub fn host_name(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ssl(&self) -> bool {
        self.ssl
    }

    pub fn default_database(&self) -> &str {
        &self.database
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn trusted_root(&self) -> Option<&reqwest::Certificate> {
        self.root_certificate.as_ref()
    }

    pub fn auth_value(&self) -> &str {
        &self.auth
    }

    pub fn scheme(&self) -> &'static str {
        if self.ssl {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port`, with IPv6 literal hosts in brackets.
    pub fn base_url_string(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme(), self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme(), self.host, self.port)
        }
    }

    /// Builds a config from environment variables.
    ///
    /// `influxdb_host` is required. `influxdb_port` defaults to 8086.
    /// Optional: `influxdb_database`, `influxdb_ssl`,
    /// `influxdb_timeout_seconds`, `influxdb_token`, or `influxdb_username`
    /// together with `influxdb_password`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_with(None, None)
    }

    /// Like [`ClientConfig::from_env`], except that `host` and `port`, when
    /// given, take precedence over `influxdb_host` and `influxdb_port`.
    /// The environment is only read, never modified.
    pub fn from_env_with(host: Option<String>, port: Option<u16>) -> Result<Self, Error> {
        let function_start = Instant::now();
        let host = match host {
            Some(host) => {
                validate_credential_variables()?;
                host
            }
            None => {
                validate_env_variables()?;
                std::env::var("influxdb_host").map_err(|_| Error::MissingConfig("influxdb_host"))?
            }
        };
        let port = match port {
            Some(port) => port,
            None => match std::env::var("influxdb_port") {
                Ok(port) => port.parse().map_err(|_| Error::InvalidConfig {
                    key: "influxdb_port",
                    value: port,
                })?,
                Err(_) => DEFAULT_PORT,
            },
        };

        let mut config = ClientConfig::new(host, port);
        if let Ok(ssl) = std::env::var("influxdb_ssl") {
            config = config.ssl(env_var_to_bool(ssl));
        }
        if let Ok(database) = std::env::var("influxdb_database") {
            config = config.database(database);
        }
        if let Ok(timeout) = std::env::var("influxdb_timeout_seconds") {
            let seconds: u64 = timeout.parse().map_err(|_| Error::InvalidConfig {
                key: "influxdb_timeout_seconds",
                value: timeout,
            })?;
            config = config.timeout(Duration::from_secs(seconds));
        }

        if let Ok(token) = std::env::var("influxdb_token") {
            config = config.token_auth(&token);
        } else if let (Ok(username), Ok(password)) = (
            std::env::var("influxdb_username"),
            std::env::var("influxdb_password"),
        ) {
            config = config.basic_auth(&username, &password);
        }

        trace!("ClientConfig::from_env duration: {:?}", function_start.elapsed());
        Ok(config)
    }
}

pub fn env_var_to_bool(env_var: String) -> bool {
    matches!(env_var.to_lowercase().as_str(), "true" | "t" | "1")
}

/// Checks that the environment holds a usable client configuration.
pub fn validate_env_variables() -> Result<(), Error> {
    if std::env::var("influxdb_host").is_err() {
        return Err(Error::MissingConfig("influxdb_host"));
    }
    validate_credential_variables()
}

// Basic credentials only make sense as a pair.
fn validate_credential_variables() -> Result<(), Error> {
    let username = std::env::var("influxdb_username");
    let password = std::env::var("influxdb_password");
    if std::env::var("influxdb_token").is_err() {
        match (username.is_ok(), password.is_ok()) {
            (true, false) => return Err(Error::MissingConfig("influxdb_password")),
            (false, true) => return Err(Error::MissingConfig("influxdb_username")),
            _ => (),
        }
    }

    Ok(())
}

#[cfg(test)]
pub mod tests;
