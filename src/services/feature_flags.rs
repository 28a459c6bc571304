//! Feature flag operations.

use crate::client::{ApiResponse, ControlPlaneClient};
use crate::errors::ApiResult;
use crate::request::RequestDescriptor;
use crate::routes;
use crate::types::{FeatureFlag, Warnings};
use serde::Serialize;

/// PATCH body for a feature flag; only the toggle is writable.
#[derive(Debug, Serialize)]
struct UpdateFeatureFlagBody {
    enabled: bool,
}

/// Service for feature flag operations.
pub struct FeatureFlagsService<'a> {
    client: &'a ControlPlaneClient,
}

impl<'a> FeatureFlagsService<'a> {
    pub(crate) fn new(client: &'a ControlPlaneClient) -> Self {
        Self { client }
    }

    /// Fetches one feature flag by name.
    pub async fn get(&self, name: &str) -> ApiResult<(FeatureFlag, Warnings)> {
        let descriptor = RequestDescriptor::new(routes::GET_FEATURE_FLAG).uri_param("name", name);
        let ApiResponse { body, warnings, .. } = self.client.execute(descriptor).await?;
        Ok((body, warnings))
    }

    /// Lists all feature flags, following pagination transparently.
    pub async fn list(&self) -> ApiResult<(Vec<FeatureFlag>, Warnings)> {
        let descriptor = RequestDescriptor::new(routes::GET_FEATURE_FLAGS);

        let mut flags = Vec::new();
        let warnings = self
            .client
            .paginate::<FeatureFlag, _>(descriptor, |flag| {
                flags.push(flag);
                Ok(())
            })
            .await?;

        Ok((flags, warnings))
    }

    /// Toggles a feature flag, returning the server's view of it.
    pub async fn update(&self, flag: &FeatureFlag) -> ApiResult<(FeatureFlag, Warnings)> {
        let descriptor = RequestDescriptor::new(routes::PATCH_FEATURE_FLAG)
            .uri_param("name", flag.name.as_str())
            .json_body(&UpdateFeatureFlagBody {
                enabled: flag.enabled,
            })?;
        let ApiResponse { body, warnings, .. } = self.client.execute(descriptor).await?;
        Ok((body, warnings))
    }
}
