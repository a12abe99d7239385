//! Shared test utilities and fixtures.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::ClientConfig;
use crate::transport::{HttpRequest, HttpResponse, SESSION_ID_HEADER};

pub(crate) fn test_config() -> ClientConfig {
    ClientConfig::new("http://127.0.0.1:9091/transmission/rpc")
}

pub(crate) fn make_response(status: StatusCode, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HeaderMap::new(),
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub(crate) fn make_success(arguments: Value) -> HttpResponse {
    make_response(
        StatusCode::OK,
        json!({"result": "success", "arguments": arguments}),
    )
}

pub(crate) fn make_conflict(session_id: &str) -> HttpResponse {
    let mut response = make_response(StatusCode::CONFLICT, json!({}));
    response
        .headers
        .insert(SESSION_ID_HEADER, HeaderValue::from_str(session_id).unwrap());
    response
}

pub(crate) fn header<'r>(request: &'r HttpRequest, name: &str) -> Option<&'r [u8]> {
    request.headers.get(name).map(HeaderValue::as_bytes)
}

pub(crate) fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

pub(crate) fn make_stats() -> Value {
    json!({
        "activeTorrentCount": 1,
        "downloadSpeed": 1000,
        "pausedTorrentCount": 0,
        "torrentCount": 1,
        "uploadSpeed": 500,
        "cumulative-stats": {
            "uploadedBytes": 500,
            "downloadedBytes": 1000,
            "filesAdded": 5,
            "sessionCount": 10,
            "secondsActive": 3600
        },
        "current-stats": {
            "uploadedBytes": 50,
            "downloadedBytes": 100,
            "filesAdded": 1,
            "sessionCount": 1,
            "secondsActive": 600
        }
    })
}

/// Collects formatted log output for the current thread.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes this thread's events here until the guard drops.
    pub(crate) fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub(crate) fn warnings(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(" WARN "))
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
