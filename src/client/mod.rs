//! Control-plane client: the single-operation orchestrator and the
//! page-following loop.

use crate::config::{ControlPlaneConfig, ControlPlaneConfigBuilder};
use crate::errors::{ApiError, ApiResult};
use crate::pagination::PaginatedList;
use crate::request::{self, ApiRequest, RequestDescriptor};
use crate::response::{self, ResponseEnvelope};
use crate::services::FeatureFlagsService;
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::types::{JobHandle, Warnings};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one successful operation.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded response body; `()` when the caller asked for none.
    pub body: T,
    /// Handle of the asynchronous job the server created, if any.
    pub job: Option<JobHandle>,
    /// Warnings emitted while serving the request, in emission order.
    pub warnings: Warnings,
}

/// Control-plane API client.
///
/// Holds no cross-call mutable state; the transport is the only shared
/// resource and is injected at construction. Each call builds its own
/// request and response values, so independent calls from multiple tasks
/// are safe.
pub struct ControlPlaneClient {
    /// Configuration.
    config: ControlPlaneConfig,
    /// Injected connection layer.
    transport: Arc<dyn Transport>,
    /// Observed at every safe point; cancelling aborts in-flight work.
    cancel: CancellationToken,
}

impl ControlPlaneClient {
    /// Creates a client with the production HTTP transport.
    pub fn new(config: ControlPlaneConfig) -> ApiResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self {
            config,
            transport,
            cancel: CancellationToken::new(),
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> ControlPlaneClientBuilder {
        ControlPlaneClientBuilder::new()
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// A clone of the cancellation token. Cancelling it aborts the current
    /// in-flight transport call and any pending pagination loop at the
    /// next safe point; warnings accumulated before cancellation are still
    /// returned on the error.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // Service accessors

    /// Gets the feature flags service.
    pub fn feature_flags(&self) -> FeatureFlagsService<'_> {
        FeatureFlagsService::new(self)
    }

    // Orchestration

    /// Executes `descriptor` and decodes the response body into `T`.
    ///
    /// On a semantic error the warnings extracted from the failed response
    /// ride along on the returned [`ApiError`]; server warnings may
    /// explain a failure.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> ApiResult<ApiResponse<T>> {
        let (response, envelope) = self.perform(descriptor).await?;
        let body = response::decode_body(&response)
            .map_err(|e| e.with_warnings(envelope.warnings.clone()))?;

        Ok(ApiResponse {
            body,
            job: envelope.job,
            warnings: envelope.warnings,
        })
    }

    /// Executes `descriptor`, draining the response body without decoding
    /// it. Use this when only the job handle and warnings matter.
    pub async fn execute_unit(&self, descriptor: RequestDescriptor) -> ApiResult<ApiResponse<()>> {
        let (_response, envelope) = self.perform(descriptor).await?;

        Ok(ApiResponse {
            body: (),
            job: envelope.job,
            warnings: envelope.warnings,
        })
    }

    /// Follows a list endpoint across pages, invoking `on_item` once per
    /// decoded item, in page order, then item order within a page.
    ///
    /// Warnings from every page accumulate in fetch order and are returned
    /// on success or attached to the error on failure; even a page that
    /// leads to failure contributes its warnings first. An error from
    /// `on_item` aborts pagination immediately. No page-count bound is
    /// enforced here; against a server that never terminates pagination,
    /// the cancellation token is the caller's safety valve.
    pub async fn paginate<T, F>(
        &self,
        descriptor: RequestDescriptor,
        mut on_item: F,
    ) -> ApiResult<Warnings>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> ApiResult<()>,
    {
        let mut warnings = Warnings::new();
        let mut current = descriptor;

        loop {
            if self.cancel.is_cancelled() {
                return Err(ApiError::cancelled().with_warnings(warnings));
            }

            let (response, envelope) = match self.perform(current).await {
                Ok(result) => result,
                Err(error) => {
                    let page_warnings = error.warnings().clone();
                    warnings.extend(page_warnings);
                    return Err(error.with_warnings(warnings));
                }
            };
            warnings.extend(envelope.warnings);

            let page: PaginatedList<T> = match response::decode_body(&response) {
                Ok(page) => page,
                Err(error) => return Err(error.with_warnings(warnings)),
            };

            let next = page.next_href().map(str::to_owned);
            for item in page.resources {
                if let Err(error) = on_item(item) {
                    return Err(error.with_warnings(warnings));
                }
            }

            match next {
                Some(href) => {
                    debug!(href = %href, "following next page");
                    current = RequestDescriptor::with_url(href);
                }
                None => break,
            }
        }

        Ok(warnings)
    }

    /// Builds, sends, and maps the status of one request. Returns the raw
    /// response together with its extracted envelope; non-2xx responses
    /// come back as a mapped error carrying the envelope's warnings.
    async fn perform(
        &self,
        descriptor: RequestDescriptor,
    ) -> ApiResult<(TransportResponse, ResponseEnvelope)> {
        let request = request::build(&descriptor, &self.config)?;
        let response = self.send(request).await?;
        let envelope = response::envelope(&response);

        if !response.status.is_success() {
            let error = ApiError::from_response(response.status.as_u16(), &response.body)
                .with_warnings(envelope.warnings);
            return Err(error);
        }

        Ok((response, envelope))
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<TransportResponse> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }

        debug!(method = %request.method, url = %request.url, "sending request");

        tokio::select! {
            _ = self.cancel.cancelled() => Err(ApiError::cancelled()),
            result = self.transport.send(request) => result,
        }
    }
}

/// Builder for [`ControlPlaneClient`].
pub struct ControlPlaneClientBuilder {
    config_builder: ControlPlaneConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
    cancel: Option<CancellationToken>,
}

impl ControlPlaneClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: ControlPlaneConfig::builder(),
            transport: None,
            cancel: None,
        }
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Injects a transport, replacing the production HTTP transport. The
    /// caller owns the transport's lifecycle.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Installs an externally owned cancellation token.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the client.
    pub fn build(self) -> ApiResult<ControlPlaneClient> {
        let config = self.config_builder.build()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        Ok(ControlPlaneClient {
            config,
            transport,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for ControlPlaneClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
