//! Response decoding: body deserialization plus warning and job-location
//! extraction.
//!
//! Nothing here inspects the HTTP status. Status interpretation happens in
//! the orchestrator via the error mapper, so warnings can still be
//! extracted from error responses.

use crate::errors::{ApiError, ApiErrorKind, ApiResult};
use crate::transport::TransportResponse;
use crate::types::{JobHandle, Warnings};
use serde::de::DeserializeOwned;

/// Response header carrying non-fatal server warnings. Zero or more
/// occurrences; each value is one warning string.
pub const WARNING_HEADER: &str = "x-api-warnings";

/// Response header pointing at an asynchronous job created as a side
/// effect of the request. At most one occurrence; surfaced verbatim.
pub const LOCATION_HEADER: &str = "location";

/// Metadata extracted from a response independently of its status.
#[derive(Debug, Clone, Default)]
pub struct ResponseEnvelope {
    /// Warnings emitted while serving the request, in emission order.
    pub warnings: Warnings,
    /// Handle of the asynchronous job the server created, if any.
    pub job: Option<JobHandle>,
}

/// Extracts warnings and the job location from `response`.
pub fn envelope(response: &TransportResponse) -> ResponseEnvelope {
    let warnings = response
        .header_values(WARNING_HEADER)
        .into_iter()
        .collect();
    let job = response
        .header(LOCATION_HEADER)
        .filter(|location| !location.is_empty())
        .map(JobHandle::from);

    ResponseEnvelope { warnings, job }
}

/// Deserializes the response body into `T`.
///
/// On failure the raw body is retained on the error for diagnostics.
pub fn decode_body<T: DeserializeOwned>(response: &TransportResponse) -> ApiResult<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        ApiError::new(
            ApiErrorKind::DecodeFailure,
            format!("failed to deserialize response body: {}", e),
        )
        .with_status(response.status.as_u16())
        .with_raw_body(response.body.clone())
        .with_cause(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureFlag;
    use bytes::Bytes;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::StatusCode;

    fn response(status: u16, body: &str, headers: &[(&str, &str)]) -> TransportResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        TransportResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: map,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    #[test]
    fn test_envelope_extracts_warnings_in_order() {
        let response = response(
            200,
            "{}",
            &[("X-Api-Warnings", "w1"), ("X-Api-Warnings", "w2")],
        );

        let envelope = envelope(&response);
        assert_eq!(envelope.warnings.as_slice(), &["w1", "w2"]);
        assert!(envelope.job.is_none());
    }

    #[test]
    fn test_envelope_extracts_job_location() {
        let response = response(202, "", &[("Location", "https://api.example.com/v3/jobs/j1")]);

        let envelope = envelope(&response);
        assert_eq!(
            envelope.job.as_ref().map(JobHandle::as_str),
            Some("https://api.example.com/v3/jobs/j1")
        );
        assert!(envelope.warnings.is_empty());
    }

    #[test]
    fn test_empty_location_is_no_job() {
        let response = response(200, "{}", &[("Location", "")]);
        assert!(envelope(&response).job.is_none());
    }

    #[test]
    fn test_envelope_works_on_error_responses() {
        let response = response(404, r#"{"error_code":"NotFound"}"#, &[("X-Api-Warnings", "w1")]);
        assert_eq!(envelope(&response).warnings.as_slice(), &["w1"]);
    }

    #[test]
    fn test_decode_body() {
        let response = response(200, r#"{"name":"custom_flag","enabled":true}"#, &[]);
        let flag: FeatureFlag = decode_body(&response).unwrap();

        assert_eq!(flag.name, "custom_flag");
        assert!(flag.enabled);
    }

    #[test]
    fn test_decode_failure_retains_raw_body() {
        let response = response(200, "not json", &[]);
        let error = decode_body::<FeatureFlag>(&response).unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::DecodeFailure);
        assert_eq!(error.raw_body(), Some(b"not json".as_slice()));
        assert_eq!(error.status_code(), Some(200));
    }
}
