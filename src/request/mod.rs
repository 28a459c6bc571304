//! Logical request descriptors and the transport-request builder.

use crate::config::ControlPlaneConfig;
use crate::errors::{ApiError, ApiErrorKind, ApiResult};
use crate::routes::{self, UriParams};
use reqwest::Method;
use serde::Serialize;

/// Describes one logical operation against the control plane.
///
/// A descriptor targets either a named route or an explicit URL. When
/// `url` is set it takes precedence and route resolution is skipped
/// entirely; the paginator relies on this to follow next-page hrefs.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    route: &'static str,
    uri_params: UriParams,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
    url: Option<String>,
    method: Option<Method>,
}

impl RequestDescriptor {
    /// Starts a descriptor for a named route.
    pub fn new(route: &'static str) -> Self {
        Self {
            route,
            ..Default::default()
        }
    }

    /// Starts a descriptor targeting an explicit absolute or relative URL,
    /// bypassing route resolution. The method defaults to GET; override it
    /// with [`method`](Self::method).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the HTTP method for an explicit-URL descriptor. Named routes
    /// carry their own method; this override only applies when `url` is
    /// set.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Supplies a URI parameter for path-template substitution.
    pub fn uri_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.uri_params.insert(name, value.into());
        self
    }

    /// Appends a query parameter. Repeated keys are preserved in the order
    /// given, not collapsed.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends an extra header, applied after route defaults so it may
    /// override them.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a JSON request body. A value that cannot be represented in
    /// JSON fails here with `EncodeFailure`, before anything is sent.
    pub fn json_body<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(ApiError::encode)?;
        self.body = Some(value);
        Ok(self)
    }
}

/// An immutable, fully assembled transport request. Producing one performs
/// no network I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL, query included.
    pub url: String,
    /// Headers in application order. Defaults shadowed by a
    /// caller-supplied header of the same name are already filtered out;
    /// repeated names are distinct values of a multi-value header.
    pub headers: Vec<(String, String)>,
    /// Serialized request body, if any.
    pub body: Option<Vec<u8>>,
}

/// Assembles the transport request for `descriptor`.
///
/// Resolves the route (or takes the explicit URL), serializes the body,
/// appends query parameters in input order with duplicate keys preserved,
/// and applies extra headers after the defaults.
pub fn build(descriptor: &RequestDescriptor, config: &ControlPlaneConfig) -> ApiResult<ApiRequest> {
    let base = config.parsed_base_url()?;

    let (method, mut url) = match descriptor.url.as_deref() {
        Some(explicit) => {
            // Explicit URLs usually arrive in server payloads (next-page
            // hrefs), so a malformed one is bad server data, not bad
            // configuration.
            let url = base.join(explicit).map_err(|e| {
                ApiError::new(
                    ApiErrorKind::DecodeFailure,
                    format!("invalid request URL '{}': {}", explicit, e),
                )
            })?;
            let method = descriptor.method.clone().unwrap_or(Method::GET);
            (method, url)
        }
        None => {
            let route = routes::resolve(descriptor.route, &descriptor.uri_params)?;
            let url = base
                .join(&route.path)
                .map_err(|e| ApiError::configuration(format!("invalid request URL: {}", e)))?;
            (route.method, url)
        }
    };

    if !descriptor.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &descriptor.query {
            pairs.append_pair(key, value);
        }
    }

    let body = descriptor
        .body
        .as_ref()
        .map(|value| serde_json::to_vec(value).map_err(ApiError::encode))
        .transpose()?;

    let mut defaults = vec![
        ("Accept", "application/json".to_string()),
        ("User-Agent", config.user_agent.clone()),
    ];
    if body.is_some() {
        defaults.push(("Content-Type", "application/json".to_string()));
    }

    // A caller-supplied header shadows the default of the same name;
    // repeated caller headers are all kept and sent as multiple values.
    let mut headers: Vec<(String, String)> = defaults
        .into_iter()
        .filter(|(name, _)| {
            !descriptor
                .headers
                .iter()
                .any(|(caller, _)| caller.eq_ignore_ascii_case(name))
        })
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    headers.extend(descriptor.headers.iter().cloned());

    Ok(ApiRequest {
        method,
        url: url.into(),
        headers,
        body,
    })
}
