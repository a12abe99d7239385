//! HTTP transport: one POST per call plus the session-id handshake.
//!
//! The daemon guards against CSRF with a session id. Every request carries the last id the
//! daemon handed out, empty before the first exchange. A request with an empty or stale id is
//! answered with `409 Conflict` and the current id in the `X-Transmission-Session-Id`
//! header; the transport stores it and replays the request exactly once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, trace};
use transrpc_types::{AuthFailure, RpcError, RpcResult};
use url::Url;

use crate::config::Credentials;
use crate::envelope::{decode_response, encode_request};
use crate::requests::RpcMethod;

/// Header carrying the CSRF session id.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// A request ready to be POSTed.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// RPC endpoint.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Vec<u8>,
}

/// What came back from the daemon.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Vec<u8>,
}

/// Sends one HTTP request. The seam between the RPC logic and the network.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait HttpSend {
    /// POSTs `request` and returns whatever the server answered, whatever the status.
    /// Only failures to get an answer at all are errors.
    async fn send(&self, request: HttpRequest) -> RpcResult<HttpResponse>;
}

/// [`HttpSend`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    http: reqwest::Client,
}

impl ReqwestSender {
    /// Builds a sender whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RpcError::transport)?;
        Ok(Self { http })
    }
}

impl HttpSend for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> RpcResult<HttpResponse> {
        let response = self
            .http
            .post(request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(RpcError::transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(RpcError::transport)?.to_vec();
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Turns typed requests into HTTP exchanges with one daemon.
pub(crate) struct Transport<H = ReqwestSender> {
    sender: H,
    url: Url,
    authorization: Option<HeaderValue>,
    // Concurrent calls that hit a 409 may each store a fresh id. Every stored id came from
    // the daemon, so whichever write lands last is still valid.
    session_id: RwLock<HeaderValue>,
    next_tag: AtomicU64,
}

impl<H: HttpSend> Transport<H> {
    pub(crate) fn new(sender: H, url: Url, credentials: Option<&Credentials>) -> RpcResult<Self> {
        let authorization = credentials.map(basic_authorization).transpose()?;
        Ok(Self {
            sender,
            url,
            authorization,
            session_id: RwLock::new(HeaderValue::from_static("")),
            next_tag: AtomicU64::new(1),
        })
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// The session id the next request will carry; empty until the first handshake.
    pub(crate) fn session_id(&self) -> HeaderValue {
        self.session_id.read().clone()
    }

    /// Sends `request` and decodes its response arguments.
    pub(crate) async fn execute<M: RpcMethod>(&self, request: &M) -> RpcResult<M::Response> {
        let method = request.method();
        let tag = self.next_tag.fetch_add(1, Ordering::Relaxed);
        let body = encode_request(request, Some(tag))?;
        trace!(method, tag, body = %String::from_utf8_lossy(&body), "sending rpc request");

        let mut response = self.post(body.clone()).await?;
        if response.status == StatusCode::CONFLICT {
            let session_id = response.headers.get(SESSION_ID_HEADER).cloned().ok_or_else(|| {
                RpcError::protocol(format!("409 response without a {SESSION_ID_HEADER} header"))
            })?;
            debug!(method, ?session_id, "session id refreshed, retrying");
            *self.session_id.write() = session_id;

            response = self.post(body).await?;
            if response.status == StatusCode::CONFLICT {
                return Err(RpcError::protocol(
                    "daemon rejected a freshly issued session id",
                ));
            }
        }

        match response.status {
            StatusCode::UNAUTHORIZED => {
                let failure = if self.authorization.is_some() {
                    AuthFailure::RejectedCredentials
                } else {
                    AuthFailure::MissingCredentials
                };
                Err(RpcError::Authentication(failure))
            }
            StatusCode::FORBIDDEN => Err(RpcError::Authentication(
                AuthFailure::AddressNotWhitelisted,
            )),
            // Any other status still carries an envelope; its `result` says what went wrong.
            status => {
                if !status.is_success() {
                    debug!(method, %status, "non-success status, decoding envelope anyway");
                }
                trace!(method, tag, body = %String::from_utf8_lossy(&response.body), "rpc response");
                decode_response(&response.body)
            }
        }
    }

    async fn post(&self, body: Vec<u8>) -> RpcResult<HttpResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }
        // The guard is dropped here, before the request is awaited.
        let session_id = self.session_id.read().clone();
        headers.insert(SESSION_ID_HEADER, session_id);
        self.sender
            .send(HttpRequest {
                url: self.url.clone(),
                headers,
                body,
            })
            .await
    }
}

impl<H> std::fmt::Debug for Transport<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("url", &self.url.as_str())
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("session_id", &*self.session_id.read())
            .finish_non_exhaustive()
    }
}

fn basic_authorization(credentials: &Credentials) -> RpcResult<HeaderValue> {
    let token = STANDARD.encode(format!(
        "{}:{}",
        credentials.username(),
        credentials.password()
    ));
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))
        .map_err(|e| RpcError::construction(format!("credentials are not a valid header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
