//! Arbitration service client
//!
//! [`ArbitrationService`] is the one call the orchestrator makes over the
//! network. [`HttpArbiter`] implements it against the StockZero HTTP API:
//! JSON POST to the endpoint of the selected engine, with the CSRF token
//! from the session cookie in the `X-CSRFToken` header.

use crate::networking::cookies::get_cookie;
use crate::networking::error::{NetworkError, NetworkResult};
use crate::networking::protocol::{EngineMode, MoveReply, MoveRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Header carrying the anti-forgery token
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Remote authority deciding the opponent's reply
#[async_trait]
pub trait ArbitrationService: Send + Sync {
    /// Submit a move; `Ok` is any structured reply (including rejections),
    /// `Err` is a transport failure.
    async fn submit(&self, mode: EngineMode, request: &MoveRequest) -> NetworkResult<MoveReply>;
}

/// HTTP client for the StockZero move API
#[derive(Debug, Clone)]
pub struct HttpArbiter {
    http: reqwest::Client,
    base_url: Url,
    cookie: Option<String>,
    csrf_cookie_name: String,
}

impl HttpArbiter {
    /// `base_url` may carry a path prefix (`https://host/chess`); endpoints
    /// are resolved beneath it.
    pub fn new(mut base_url: Url, timeout: Duration) -> NetworkResult<Self> {
        if !base_url.path().ends_with('/') {
            let prefixed = format!("{}/", base_url.path());
            base_url.set_path(&prefixed);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            cookie: None,
            csrf_cookie_name: "csrftoken".to_string(),
        })
    }

    /// Session cookie header to forward; the CSRF token is read from it.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_csrf_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie_name = name.into();
        self
    }

    pub fn endpoint_url(&self, mode: EngineMode) -> NetworkResult<Url> {
        Ok(self.base_url.join(mode.endpoint().trim_start_matches('/'))?)
    }

    fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(cookie) = &self.cookie else {
            return headers;
        };

        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(e) => warn!("[NETWORK] Cookie header is not valid header text: {}", e),
        }

        match get_cookie(cookie, &self.csrf_cookie_name) {
            Some(token) => match HeaderValue::from_str(&token) {
                Ok(value) => {
                    headers.insert(CSRF_HEADER, value);
                }
                Err(e) => warn!("[NETWORK] CSRF token is not valid header text: {}", e),
            },
            None => debug!(
                "[NETWORK] No {} cookie present, sending without CSRF token",
                self.csrf_cookie_name
            ),
        }
        headers
    }
}

#[async_trait]
impl ArbitrationService for HttpArbiter {
    async fn submit(&self, mode: EngineMode, request: &MoveRequest) -> NetworkResult<MoveReply> {
        let url = self.endpoint_url(mode)?;
        info!("[NETWORK] POST {} move={}", url, request.mv);

        let response = self
            .http
            .post(url)
            .headers(self.session_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("[NETWORK] Request timed out");
                }
                NetworkError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("[NETWORK] Service answered {}", status);
            return Err(NetworkError::Status { status });
        }

        let body = response.bytes().await?;
        let reply: MoveReply = serde_json::from_slice(&body)?;
        debug!("[NETWORK] Reply: {:?}", reply);
        Ok(reply)
    }
}
