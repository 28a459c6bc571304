//! Error types for the control-plane client, including the mapper that
//! turns a failed response into a semantic error kind.

use crate::types::Warnings;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for control-plane operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Closed classification of client failures.
///
/// Every non-2xx outcome and every transport or codec failure is mapped to
/// exactly one of these kinds before it reaches the caller; raw status
/// codes never leak through the public contract (they remain available as
/// auxiliary detail on [`ApiError`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Invalid client configuration.
    InvalidConfiguration,
    /// Request name not present in the route table.
    UnknownRoute,
    /// A URI parameter required by the path template was not supplied.
    MissingUriParam,
    /// Request body serialization failed; nothing was sent.
    EncodeFailure,
    /// Response body did not match the expected shape.
    DecodeFailure,
    /// Connection-level failure: refused, reset, timed out, TLS.
    TransportFailure,
    /// The resource does not exist (404).
    NotFound,
    /// Missing or invalid credentials (401).
    Unauthorized,
    /// The credentials do not allow this operation (403).
    Forbidden,
    /// The requested name is already taken.
    NameConflict,
    /// The server understood the request but rejected it (422).
    Unprocessable,
    /// A 5xx or unrecognized status; the raw status is retained.
    ServerError,
    /// A list item did not satisfy the declared item shape.
    UnknownObjectInList,
    /// The operation was cancelled before completion.
    Cancelled,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::UnknownRoute => write!(f, "unknown_route"),
            Self::MissingUriParam => write!(f, "missing_uri_param"),
            Self::EncodeFailure => write!(f, "encode_failure"),
            Self::DecodeFailure => write!(f, "decode_failure"),
            Self::TransportFailure => write!(f, "transport_failure"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NameConflict => write!(f, "name_conflict"),
            Self::Unprocessable => write!(f, "unprocessable"),
            Self::ServerError => write!(f, "server_error"),
            Self::UnknownObjectInList => write!(f, "unknown_object_in_list"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Error payload shape returned by the control plane.
///
/// All fields are optional on the wire; an empty detail is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    /// Application-level error code, e.g. `"NotFound"`.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<i64>,
}

/// Refinements applied on top of the status-based kind when the decoded
/// error body carries an identifiable application-level code. The exact
/// catalog is server configuration; this table covers the codes the client
/// acts on.
const CODE_REFINEMENTS: &[(&str, ApiErrorKind)] = &[
    ("UniquenessError", ApiErrorKind::NameConflict),
    ("NameTaken", ApiErrorKind::NameConflict),
    ("NotFound", ApiErrorKind::NotFound),
    ("NotAuthenticated", ApiErrorKind::Unauthorized),
    ("InvalidAuthToken", ApiErrorKind::Unauthorized),
    ("NotAuthorized", ApiErrorKind::Forbidden),
];

/// Control-plane API error with auxiliary detail.
///
/// Carries the warnings collected before the failure so diagnostic context
/// is never lost, and retains the raw body when decoding failed.
#[derive(Error, Debug)]
pub struct ApiError {
    /// Error kind.
    kind: ApiErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code, when a response existed.
    status_code: Option<u16>,
    /// Decoded error payload, when one could be parsed.
    detail: Option<ErrorDetail>,
    /// Raw response body, retained on decode failures.
    raw_body: Option<Bytes>,
    /// Warnings collected before the failure.
    warnings: Warnings,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        Ok(())
    }
}

impl ApiError {
    /// Creates a new error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            detail: None,
            raw_body: None,
            warnings: Warnings::new(),
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the decoded error payload.
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Retains the raw response body for diagnostics.
    pub fn with_raw_body(mut self, body: impl Into<Bytes>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    /// Replaces the warnings collected before the failure.
    pub fn with_warnings(mut self, warnings: Warnings) -> Self {
        self.warnings = warnings;
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Gets the HTTP status code, when a response existed.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the decoded error payload.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        self.detail.as_ref()
    }

    /// Gets the raw response body retained on decode failures.
    pub fn raw_body(&self) -> Option<&[u8]> {
        self.raw_body.as_deref()
    }

    /// Warnings collected before the failure, in emission order.
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidConfiguration, message)
    }

    /// Creates an unknown-route error.
    pub fn unknown_route(name: &str) -> Self {
        Self::new(
            ApiErrorKind::UnknownRoute,
            format!("no route registered for request name '{}'", name),
        )
    }

    /// Creates a missing-URI-parameter error.
    pub fn missing_uri_param(name: &str) -> Self {
        Self::new(
            ApiErrorKind::MissingUriParam,
            format!("URI parameter '{}' required by the route was not supplied", name),
        )
    }

    /// Creates an encode-failure error.
    pub fn encode(cause: serde_json::Error) -> Self {
        Self::new(
            ApiErrorKind::EncodeFailure,
            format!("failed to serialize request body: {}", cause),
        )
        .with_cause(cause)
    }

    /// Creates a transport-failure error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::TransportFailure, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::new(ApiErrorKind::Cancelled, "operation cancelled")
    }

    /// Creates an unknown-object-in-list error. This is a programmer
    /// contract violation, not a retryable condition.
    pub fn unknown_object_in_list(expected: &str) -> Self {
        Self::new(
            ApiErrorKind::UnknownObjectInList,
            format!("list item does not satisfy the declared shape '{}'", expected),
        )
    }

    /// Maps a failed response into a semantic error.
    ///
    /// The status code determines the base kind; an identifiable
    /// application-level code in the decoded body refines it. A malformed
    /// error body never panics: the status-based kind stands, with a
    /// decode note attached as the cause and the raw body retained.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let base = Self::kind_from_status(status);

        match serde_json::from_slice::<ErrorDetail>(body) {
            Ok(detail) => {
                let kind = Self::refine_kind(base, &detail);
                let message = detail
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("HTTP {} error", status));
                Self::new(kind, message).with_status(status).with_detail(detail)
            }
            Err(cause) => Self::new(base, format!("HTTP {} error", status))
                .with_status(status)
                .with_raw_body(Bytes::copy_from_slice(body))
                .with_cause(cause),
        }
    }

    /// Maps an HTTP status code to the default error kind.
    fn kind_from_status(status: u16) -> ApiErrorKind {
        match status {
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::NameConflict,
            422 => ApiErrorKind::Unprocessable,
            _ => ApiErrorKind::ServerError,
        }
    }

    /// Upgrades the status-based kind when the error body names a known
    /// application-level code; otherwise the base kind stands.
    fn refine_kind(base: ApiErrorKind, detail: &ErrorDetail) -> ApiErrorKind {
        let Some(code) = detail.error_code.as_deref() else {
            return base;
        };
        CODE_REFINEMENTS
            .iter()
            .find(|(suffix, _)| code.ends_with(suffix))
            .map(|(_, kind)| *kind)
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ApiError::new(ApiErrorKind::NotFound, "flag not found").with_status(404);

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("flag not found"));
        assert!(display.contains("404"));
    }

    #[test]
    fn test_kind_from_status() {
        let cases = [
            (401, ApiErrorKind::Unauthorized),
            (403, ApiErrorKind::Forbidden),
            (404, ApiErrorKind::NotFound),
            (409, ApiErrorKind::NameConflict),
            (422, ApiErrorKind::Unprocessable),
            (500, ApiErrorKind::ServerError),
            (502, ApiErrorKind::ServerError),
            (418, ApiErrorKind::ServerError),
        ];

        for (status, kind) in cases {
            let error = ApiError::from_response(status, b"{}");
            assert_eq!(error.kind(), kind, "status {}", status);
            assert_eq!(error.status_code(), Some(status));
        }
    }

    #[test]
    fn test_error_code_refines_kind() {
        let error = ApiError::from_response(
            422,
            br#"{"error_code":"CP-UniquenessError","description":"name is taken"}"#,
        );

        assert_eq!(error.kind(), ApiErrorKind::NameConflict);
        assert_eq!(error.status_code(), Some(422));
        assert_eq!(format!("{}", error), "[name_conflict] name is taken (HTTP 422)");
    }

    #[test]
    fn test_unrecognized_error_code_keeps_status_kind() {
        let error = ApiError::from_response(422, br#"{"error_code":"SomethingElse"}"#);
        assert_eq!(error.kind(), ApiErrorKind::Unprocessable);
    }

    #[test]
    fn test_not_found_error_code() {
        let error = ApiError::from_response(404, br#"{"error_code":"NotFound"}"#);
        assert_eq!(error.kind(), ApiErrorKind::NotFound);
        assert_eq!(
            error.detail().and_then(|d| d.error_code.as_deref()),
            Some("NotFound")
        );
    }

    #[test]
    fn test_malformed_error_body_falls_back_to_status() {
        let error = ApiError::from_response(404, b"<html>not json</html>");

        assert_eq!(error.kind(), ApiErrorKind::NotFound);
        assert_eq!(error.raw_body(), Some(b"<html>not json</html>".as_slice()));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_warnings_attached_to_error() {
        let warnings: Warnings = vec!["w1".to_string(), "w2".to_string()].into();
        let error = ApiError::from_response(404, b"{}").with_warnings(warnings);

        assert_eq!(error.warnings().as_slice(), &["w1", "w2"]);
    }
}
