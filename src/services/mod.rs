//! Resource services exposed by the client.

mod feature_flags;

pub use feature_flags::FeatureFlagsService;
