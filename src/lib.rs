//! # Control Plane Integration Library
//!
//! Request/response core of a REST client for a resource-oriented
//! cloud-management control plane:
//! - Named-route request building with URI-parameter substitution
//! - Transparent multi-page list traversal
//! - Warning aggregation across single and multi-page operations
//! - Asynchronous job handles surfaced from response metadata
//! - A closed semantic error taxonomy replacing raw status codes
//! - Injected transport and external cancellation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_controlplane::ControlPlaneClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ControlPlaneClient::builder()
//!         .base_url("https://api.controlplane.example.com")
//!         .build()?;
//!
//!     let (flag, warnings) = client.feature_flags().get("custom_flag").await?;
//!     for warning in &warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     println!("{} = {}", flag.name, flag.enabled);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Request pipeline
pub mod request;
pub mod routes;
pub mod transport;

// Response pipeline
pub mod pagination;
pub mod response;

// Orchestration
pub mod client;

// API Services
pub mod services;

// Re-export commonly used types
pub use client::{ApiResponse, ControlPlaneClient, ControlPlaneClientBuilder};
pub use config::{ControlPlaneConfig, ControlPlaneConfigBuilder};
pub use errors::{ApiError, ApiErrorKind, ApiResult};
pub use request::RequestDescriptor;
pub use transport::Transport;
pub use types::{FeatureFlag, JobHandle, Warnings};
