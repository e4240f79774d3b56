use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

use crate::transport::{AsyncTransport, HttpRequest, HttpResponse, Transport};

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
pub struct ConnectionRefused;

type Responder = fn(&HttpRequest) -> (StatusCode, &'static str);

/// Records every request and answers from a fixed responder, or fails every
/// send when `refuse` is set.
#[derive(Clone)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<HttpRequest>>>,
    responder: Responder,
    refuse: bool,
}

impl RecordingTransport {
    pub fn new(responder: Responder) -> Self {
        RecordingTransport {
            sent: Arc::new(Mutex::new(Vec::new())),
            responder,
            refuse: false,
        }
    }

    /// Answers 204 to writes and pings, 200 to everything else.
    pub fn accepting() -> Self {
        Self::new(|request| match request.url.path() {
            "/write" | "/ping" => (StatusCode::NO_CONTENT, ""),
            _ => (StatusCode::OK, "{\"results\":[{\"statement_id\":0}]}"),
        })
    }

    pub fn refusing() -> Self {
        RecordingTransport {
            refuse: true,
            ..Self::accepting()
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn answer(&self, request: HttpRequest) -> Result<HttpResponse, ConnectionRefused> {
        let (status, body) = (self.responder)(&request);
        self.sent.lock().unwrap().push(request);
        if self.refuse {
            return Err(ConnectionRefused);
        }
        Ok(HttpResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        })
    }
}

impl Transport for RecordingTransport {
    type Error = ConnectionRefused;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        self.answer(request)
    }
}

impl AsyncTransport for RecordingTransport {
    type Error = ConnectionRefused;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        tokio::task::yield_now().await;
        self.answer(request)
    }
}

/// Rejects anything that does not look like line protocol, the way the
/// server answers `lorem ipsum`.
pub fn strict_write_responder(request: &HttpRequest) -> (StatusCode, &'static str) {
    let body = request.body.clone().unwrap_or_default();
    let text = String::from_utf8_lossy(&body);
    let valid = text
        .lines()
        .all(|line| line.split(' ').nth(1).is_some_and(|fields| fields.contains('=')));
    if valid {
        (StatusCode::NO_CONTENT, "")
    } else {
        (
            StatusCode::BAD_REQUEST,
            "{\"error\":\"unable to parse 'lorem ipsum': missing fields\"}",
        )
    }
}
