//! HTTP client for the DlVery REST API
//!
//! Attaches the bearer token, retries transport failures once, and turns a
//! 401 into a cleared session plus a `SessionEvent::Expired` broadcast.

pub mod retry;

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::logging::redact;
use crate::models::ApiResponse;
use crate::session::SessionManager;

pub use retry::{classify, RetryPolicy, TransportFailure};

pub type Query<'a> = &'a [(&'a str, String)];

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(cfg: &ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("dlvery-client/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from_config(cfg),
            session,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, &[], None, context)
            .await
            .and_then(|r| expect_data(r, context))
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        context: &str,
    ) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, query, None, context)
            .await
            .and_then(|r| expect_data(r, context))
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, context: &str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(body), context)
            .await
            .and_then(|r| expect_data(r, context))
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>, context: &str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, &[], body, context)
            .await
            .and_then(|r| expect_data(r, context))
    }

    pub async fn patch_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        context: &str,
    ) -> Result<T> {
        self.send::<T, ()>(Method::PATCH, path, query, None, context)
            .await
            .and_then(|r| expect_data(r, context))
    }

    /// DELETE returns no data; the server's confirmation message is passed through.
    pub async fn delete(&self, path: &str, context: &str) -> Result<Option<String>> {
        self.send::<serde_json::Value, ()>(Method::DELETE, path, &[], None, context)
            .await
            .map(|r| r.message)
    }

    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
        context: &str,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut retries = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            // Read per attempt so a retry picks up the current session.
            if let Some(token) = self.session.token() {
                tracing::trace!(token = %redact(&token), "Attaching bearer token");
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(method = %method, url = %url, attempt = retries + 1, "Sending request");

            match request.send().await {
                Ok(response) => return self.handle_response(response, context).await,
                Err(err) => {
                    let failure = classify(&err);
                    if self.retry.should_retry(failure, retries) {
                        retries += 1;
                        tracing::warn!(
                            method = %method,
                            url = %url,
                            error = %err,
                            delay_ms = %self.retry.delay.as_millis(),
                            "Retrying request after network error"
                        );
                        tokio::time::sleep(self.retry.delay).await;
                        continue;
                    }

                    tracing::error!(method = %method, url = %url, error = %err, "No response received");
                    return Err(match failure {
                        TransportFailure::Timeout => ClientError::Timeout,
                        TransportFailure::Setup => ClientError::Request(err.to_string()),
                        TransportFailure::Network => ClientError::network(&self.base_url),
                    });
                }
            }
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        context: &str,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Decode(e.to_string())
            }
        })?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(ApiResponse {
                    success: true,
                    message: None,
                    data: None,
                });
            }
            return serde_json::from_str(&text)
                .map_err(|e| ClientError::Decode(format!("{}: {}", context, e)));
        }

        let code = status.as_u16();
        match code {
            401 => {
                if let Err(e) = self.session.expire() {
                    tracing::error!(error = %e, "Failed to clear rejected session");
                }
            }
            403 => tracing::warn!(status = code, body = %text, "Access forbidden"),
            500..=599 => tracing::error!(status = code, body = %text, "Server error"),
            _ => tracing::warn!(status = code, body = %text, "Request failed"),
        }

        Err(ClientError::from_response(code, &text, context))
    }
}

pub fn expect_data<T>(response: ApiResponse<T>, context: &str) -> Result<T> {
    response
        .data
        .ok_or_else(|| ClientError::Decode(format!("{}: response carried no data", context)))
}
