use reqwest::StatusCode;

/// Coarse classification of the HTTP status returned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfluxStatus {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    RequestTooLarge,
    ServerError,
    UnknownError,
}

impl InfluxStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, InfluxStatus::Ok)
    }
}

impl std::fmt::Display for InfluxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            InfluxStatus::Ok => "ok",
            InfluxStatus::BadRequest => "bad request",
            InfluxStatus::Unauthorized => "unauthorized",
            InfluxStatus::NotFound => "not found",
            InfluxStatus::RequestTooLarge => "request too large",
            InfluxStatus::ServerError => "server error",
            InfluxStatus::UnknownError => "unknown error",
        };
        f.write_str(name)
    }
}

impl From<StatusCode> for InfluxStatus {
    fn from(status: StatusCode) -> Self {
        classify_status(status.as_u16())
    }
}

/// Maps an HTTP status code onto [`InfluxStatus`]. Total over `u16`.
pub fn classify_status(code: u16) -> InfluxStatus {
    match code {
        200..=299 => InfluxStatus::Ok,
        400 => InfluxStatus::BadRequest,
        401 => InfluxStatus::Unauthorized,
        404 => InfluxStatus::NotFound,
        413 => InfluxStatus::RequestTooLarge,
        500..=599 => InfluxStatus::ServerError,
        _ => InfluxStatus::UnknownError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        for code in 200..=299 {
            assert_eq!(classify_status(code), InfluxStatus::Ok, "code {code}");
        }
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(classify_status(400), InfluxStatus::BadRequest);
        assert_eq!(classify_status(401), InfluxStatus::Unauthorized);
        assert_eq!(classify_status(404), InfluxStatus::NotFound);
        assert_eq!(classify_status(413), InfluxStatus::RequestTooLarge);
        for code in (400..=499).filter(|c| ![400, 401, 404, 413].contains(c)) {
            assert_eq!(classify_status(code), InfluxStatus::UnknownError, "code {code}");
        }
    }

    #[test]
    fn test_server_errors() {
        for code in 500..=599 {
            assert_eq!(classify_status(code), InfluxStatus::ServerError, "code {code}");
        }
    }

    #[test]
    fn test_everything_else_is_unknown() {
        for code in [0, 1, 100, 101, 199, 300, 301, 304, 399, 600, 999, u16::MAX] {
            assert_eq!(classify_status(code), InfluxStatus::UnknownError, "code {code}");
        }
    }

    #[test]
    fn test_from_status_code() {
        assert_eq!(InfluxStatus::from(StatusCode::NO_CONTENT), InfluxStatus::Ok);
        assert_eq!(
            InfluxStatus::from(StatusCode::PAYLOAD_TOO_LARGE),
            InfluxStatus::RequestTooLarge
        );
        assert!(InfluxStatus::from(StatusCode::OK).is_success());
        assert!(!InfluxStatus::from(StatusCode::BAD_GATEWAY).is_success());
    }
}
