//! Configuration types for the control-plane client.

use crate::errors::{ApiError, ApiResult};
use std::time::Duration;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str =
    concat!("integrations-controlplane/", env!("CARGO_PKG_VERSION"));

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,
    /// Idle connection timeout.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 20,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Control-plane client configuration.
#[derive(Debug, Clone)]
pub struct ControlPlaneConfig {
    /// API base URL; there is no default, every deployment has its own.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Connection pool configuration.
    pub pool: PoolConfig,
}

impl ControlPlaneConfig {
    /// Creates a configuration for `base_url` with defaults everywhere else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool: PoolConfig::default(),
        }
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ControlPlaneConfigBuilder {
        ControlPlaneConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::configuration("base URL is required"));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::configuration(format!("invalid base URL: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ApiError::configuration(format!(
                "unsupported base URL scheme '{}'",
                url.scheme()
            )));
        }

        if self.user_agent.is_empty() {
            return Err(ApiError::configuration("User-Agent must not be empty"));
        }

        Ok(())
    }

    /// The parsed base URL. Call after [`validate`](Self::validate).
    pub(crate) fn parsed_base_url(&self) -> ApiResult<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| ApiError::configuration(format!("invalid base URL: {}", e)))
    }
}

/// Builder for [`ControlPlaneConfig`].
#[derive(Debug, Default)]
pub struct ControlPlaneConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    pool: Option<PoolConfig>,
}

impl ControlPlaneConfigBuilder {
    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the connection pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ApiResult<ControlPlaneConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::configuration("base URL is required"))?;

        let mut config = ControlPlaneConfig::new(base_url);
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout = timeout;
        }
        if let Some(ua) = self.user_agent {
            config.user_agent = ua;
        }
        if let Some(pool) = self.pool {
            config.pool = pool;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiErrorKind;

    #[test]
    fn test_builder_defaults() {
        let config = ControlPlaneConfig::builder()
            .base_url("https://api.example.com")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent.starts_with("integrations-controlplane/"));
    }

    #[test]
    fn test_base_url_required() {
        let error = ControlPlaneConfig::builder().build().unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let error = ControlPlaneConfig::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let error = ControlPlaneConfig::builder()
            .base_url("ftp://api.example.com")
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::InvalidConfiguration);
    }
}
