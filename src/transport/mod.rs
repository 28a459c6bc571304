//! Transport boundary: the connection layer the client sends requests
//! through.

use crate::config::ControlPlaneConfig;
use crate::errors::{ApiError, ApiErrorKind, ApiResult};
use crate::request::ApiRequest;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use tracing::debug;

/// A raw response from the wire: status, headers, and the fully drained
/// body. Draining eagerly lets the underlying connection be reused even
/// when the caller discards the body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers; access is case-insensitive and multi-value.
    pub headers: HeaderMap,
    /// Complete response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// All values of header `name`, in order of appearance.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(String::from)
            .collect()
    }

    /// First value of header `name`, if present.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    }
}

/// Connection layer abstraction.
///
/// A transport failure (refused connection, timeout, TLS) is reported as a
/// `TransportFailure` error. Any response that arrived, whatever its
/// status, is returned as a [`TransportResponse`]; status interpretation
/// belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the network call for `request`.
    async fn send(&self, request: ApiRequest) -> ApiResult<TransportResponse>;
}

/// `reqwest`-backed production transport.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport from the client configuration.
    pub fn new(config: &ControlPlaneConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                ApiError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<TransportResponse> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiError::new(
                    ApiErrorKind::EncodeFailure,
                    format!("invalid header name '{}': {}", name, e),
                )
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::new(
                    ApiErrorKind::EncodeFailure,
                    format!("invalid value for header '{}': {}", name, e),
                )
            })?;
            // The request builder already filtered shadowed defaults, so
            // repeated names here are genuine multi-value headers.
            headers.append(name, value);
        }

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.as_str())
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("request timed out: {}", e)
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                format!("transport failure: {}", e)
            };
            ApiError::transport(message).with_cause(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            ApiError::transport(format!("failed to read response body: {}", e)).with_cause(e)
        })?;

        debug!(status = %status, bytes = body.len(), "received response");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
