//! Named route table and path-template resolution.
//!
//! Routes are looked up by symbolic request name so resource services never
//! hand-assemble paths. The table here is the slice of the control plane's
//! catalog this crate covers; adding an endpoint means adding one row.

use crate::errors::{ApiError, ApiResult};
use reqwest::Method;
use std::collections::HashMap;

/// Request name for fetching one feature flag.
pub const GET_FEATURE_FLAG: &str = "get_feature_flag";
/// Request name for listing feature flags.
pub const GET_FEATURE_FLAGS: &str = "get_feature_flags";
/// Request name for updating one feature flag.
pub const PATCH_FEATURE_FLAG: &str = "patch_feature_flag";

/// URI parameters substituted into a route's path template.
pub type UriParams = HashMap<&'static str, String>;

/// The route table: request name, method, path template. Template segments
/// starting with `:` are substituted from [`UriParams`].
const ROUTES: &[(&str, Method, &str)] = &[
    (GET_FEATURE_FLAG, Method::GET, "/v3/feature_flags/:name"),
    (GET_FEATURE_FLAGS, Method::GET, "/v3/feature_flags"),
    (PATCH_FEATURE_FLAG, Method::PATCH, "/v3/feature_flags/:name"),
];

/// A resolved route: concrete method plus a fully substituted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// HTTP method of the route.
    pub method: Method,
    /// Path with every template parameter substituted.
    pub path: String,
}

/// Looks up `name` in the route table and substitutes every `:param`
/// segment from `params`.
///
/// Fails with `UnknownRoute` for an unregistered name and with
/// `MissingUriParam` when the template references a parameter that was not
/// supplied.
pub fn resolve(name: &str, params: &UriParams) -> ApiResult<ResolvedRoute> {
    let (_, method, template) = ROUTES
        .iter()
        .find(|(route_name, _, _)| *route_name == name)
        .ok_or_else(|| ApiError::unknown_route(name))?;

    let mut path = String::with_capacity(template.len());
    for segment in template.split('/') {
        if segment.is_empty() {
            continue;
        }
        path.push('/');
        match segment.strip_prefix(':') {
            Some(param) => {
                let value = params
                    .get(param)
                    .ok_or_else(|| ApiError::missing_uri_param(param))?;
                path.push_str(value);
            }
            None => path.push_str(segment),
        }
    }

    Ok(ResolvedRoute {
        method: method.clone(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiErrorKind;

    #[test]
    fn test_resolve_substitutes_params() {
        let mut params = UriParams::new();
        params.insert("name", "custom_flag".to_string());

        let route = resolve(GET_FEATURE_FLAG, &params).unwrap();

        assert_eq!(route.method, Method::GET);
        assert_eq!(route.path, "/v3/feature_flags/custom_flag");
    }

    #[test]
    fn test_resolve_without_params() {
        let route = resolve(GET_FEATURE_FLAGS, &UriParams::new()).unwrap();

        assert_eq!(route.method, Method::GET);
        assert_eq!(route.path, "/v3/feature_flags");
    }

    #[test]
    fn test_patch_route_method() {
        let mut params = UriParams::new();
        params.insert("name", "f".to_string());

        let route = resolve(PATCH_FEATURE_FLAG, &params).unwrap();
        assert_eq!(route.method, Method::PATCH);
    }

    #[test]
    fn test_missing_param_fails() {
        let error = resolve(GET_FEATURE_FLAG, &UriParams::new()).unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::MissingUriParam);
        assert!(format!("{}", error).contains("name"));
    }

    #[test]
    fn test_unknown_route_fails() {
        let error = resolve("delete_everything", &UriParams::new()).unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::UnknownRoute);
    }
}
