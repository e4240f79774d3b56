use super::{env_var_to_bool, validate_env_variables, ClientConfig, DEFAULT_PORT};
use crate::error::Error;
use std::env;
use std::time::Duration;

const ENV_VARS: [&str; 8] = [
    "influxdb_host",
    "influxdb_port",
    "influxdb_database",
    "influxdb_ssl",
    "influxdb_timeout_seconds",
    "influxdb_username",
    "influxdb_password",
    "influxdb_token",
];

fn clear_env_vars() {
    for name in ENV_VARS {
        env::remove_var(name);
    }
}

#[test]
fn test_builder() {
    // Tests the builder methods and derived values.
    let config = ClientConfig::new("db.internal", 9999)
        .ssl(true)
        .database("telemetry")
        .timeout(Duration::from_secs(5))
        .token_auth("abc");

    assert_eq!(config.host_name(), "db.internal");
    assert_eq!(config.port(), 9999);
    assert!(config.is_ssl());
    assert_eq!(config.scheme(), "https");
    assert_eq!(config.base_url_string(), "https://db.internal:9999");
    assert_eq!(config.default_database(), "telemetry");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(config.auth_value(), "Token abc");
    assert!(config.trusted_root().is_none());

    let config = config.basic_auth("user", "pwd");
    assert_eq!(config.auth_value(), "Basic dXNlcjpwd2Q=");
}

#[test]
fn test_debug_hides_credentials() {
    // Tests that the auth value never shows up in debug output.
    let config = ClientConfig::new("localhost", DEFAULT_PORT).token_auth("very-secret");
    let debug = format!("{:?}", config);
    assert!(!debug.contains("very-secret"));
    assert!(debug.contains("localhost"));
}

#[test]
fn test_env_var_to_bool() {
    assert!(env_var_to_bool("true".to_string()));
    assert!(env_var_to_bool("T".to_string()));
    assert!(env_var_to_bool("1".to_string()));
    assert!(!env_var_to_bool("false".to_string()));
    assert!(!env_var_to_bool("yes".to_string()));
}

// Environment variables are process-wide, so every case that touches them
// runs inside this one test.
#[test]
fn test_from_env() -> Result<(), Error> {
    clear_env_vars();
    assert!(matches!(
        validate_env_variables(),
        Err(Error::MissingConfig("influxdb_host"))
    ));
    assert!(ClientConfig::from_env().is_err());

    // Minimal configuration.
    env::set_var("influxdb_host", "localhost");
    let config = ClientConfig::from_env()?;
    assert_eq!(config.port(), DEFAULT_PORT);
    assert!(!config.is_ssl());
    assert_eq!(config.default_database(), "");
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.auth_value(), "");

    // Full configuration with basic auth.
    env::set_var("influxdb_port", "8443");
    env::set_var("influxdb_database", "telemetry");
    env::set_var("influxdb_ssl", "t");
    env::set_var("influxdb_timeout_seconds", "30");
    env::set_var("influxdb_username", "user");
    env::set_var("influxdb_password", "pwd");
    let config = ClientConfig::from_env()?;
    assert_eq!(config.base_url_string(), "https://localhost:8443");
    assert_eq!(config.default_database(), "telemetry");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.auth_value(), "Basic dXNlcjpwd2Q=");

    // A token takes precedence over basic credentials.
    env::set_var("influxdb_token", "abc");
    assert_eq!(ClientConfig::from_env()?.auth_value(), "Token abc");
    env::remove_var("influxdb_token");

    // Basic credentials must come as a pair.
    env::remove_var("influxdb_password");
    assert!(matches!(
        validate_env_variables(),
        Err(Error::MissingConfig("influxdb_password"))
    ));
    env::set_var("influxdb_password", "pwd");

    // Malformed numbers are reported with their key.
    env::set_var("influxdb_port", "eighty");
    assert!(matches!(
        ClientConfig::from_env(),
        Err(Error::InvalidConfig {
            key: "influxdb_port",
            ..
        })
    ));
    env::set_var("influxdb_port", "8086");
    env::set_var("influxdb_timeout_seconds", "-1");
    assert!(matches!(
        ClientConfig::from_env(),
        Err(Error::InvalidConfig {
            key: "influxdb_timeout_seconds",
            ..
        })
    ));

    // Explicit host and port win over the environment, which is left untouched.
    clear_env_vars();
    env::set_var("influxdb_port", "eighty");
    env::set_var("influxdb_database", "telemetry");
    let config = ClientConfig::from_env_with(Some("db.internal".to_string()), Some(9999))?;
    assert_eq!(config.base_url_string(), "http://db.internal:9999");
    assert_eq!(config.default_database(), "telemetry");
    assert!(env::var("influxdb_host").is_err());
    assert_eq!(env::var("influxdb_port").as_deref(), Ok("eighty"));

    // A host override still requires the port from the environment to parse,
    // and credentials to come as a pair.
    assert!(matches!(
        ClientConfig::from_env_with(Some("db.internal".to_string()), None),
        Err(Error::InvalidConfig {
            key: "influxdb_port",
            ..
        })
    ));
    env::set_var("influxdb_username", "user");
    assert!(matches!(
        ClientConfig::from_env_with(Some("db.internal".to_string()), Some(9999)),
        Err(Error::MissingConfig("influxdb_password"))
    ));

    clear_env_vars();
    Ok(())
}

#[test]
fn test_ipv6_host_is_bracketed() {
    // Tests that an IPv6 literal host still forms a valid base url.
    assert_eq!(
        ClientConfig::new("::1", 8086).base_url_string(),
        "http://[::1]:8086"
    );
    assert_eq!(
        ClientConfig::new("[fe80::1]", 8086).ssl(true).base_url_string(),
        "https://[fe80::1]:8086"
    );
    assert_eq!(
        ClientConfig::new("127.0.0.1", 8086).base_url_string(),
        "http://127.0.0.1:8086"
    );
}
