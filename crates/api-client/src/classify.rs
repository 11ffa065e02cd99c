//! Failure classification for fallback eligibility

use crate::error::ApiError;

/// Broad category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The request never reached a server
    Network,
    /// A server answered with an error status
    ServerResponse,
    /// Failed locally (configuration, validation, decoding)
    Local,
}

/// Classify a request failure
///
/// A status of `0` means a response object existed without a real HTTP
/// status, which only happens when the connection was cut; it is treated
/// as a network failure.
#[must_use]
pub fn classify(err: &ApiError) -> FailureClass {
    match err {
        ApiError::Network { .. } | ApiError::ApiResponse { status: 0, .. } => FailureClass::Network,
        ApiError::ApiResponse { .. } => FailureClass::ServerResponse,
        ApiError::Request(_)
        | ApiError::Json(_)
        | ApiError::Config(_)
        | ApiError::MissingEnvVar(_)
        | ApiError::InvalidUrl(_)
        | ApiError::Validation(_) => FailureClass::Local,
    }
}

/// Whether a failed request should be replayed against the fallback
#[must_use]
pub fn is_fallback_eligible(err: &ApiError) -> bool {
    classify(err) == FailureClass::Network
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkErrorKind;

    #[test]
    fn test_network_kinds_are_eligible() {
        for kind in [
            NetworkErrorKind::Connect,
            NetworkErrorKind::Dns,
            NetworkErrorKind::Timeout,
            NetworkErrorKind::Other,
        ] {
            assert!(is_fallback_eligible(&ApiError::network(kind, "Network Error")));
        }
    }

    #[test]
    fn test_status_zero_is_eligible() {
        assert!(is_fallback_eligible(&ApiError::api_response(0, "")));
    }

    #[test]
    fn test_error_statuses_are_not_eligible() {
        for status in [400, 401, 403, 404, 429, 500, 502, 503] {
            let err = ApiError::api_response(status, "failed");
            assert_eq!(classify(&err), FailureClass::ServerResponse);
            assert!(!is_fallback_eligible(&err));
        }
    }

    #[test]
    fn test_builder_errors_are_local() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert_eq!(classify(&ApiError::Request(err)), FailureClass::Local);
    }

    #[test]
    fn test_local_errors_are_not_eligible() {
        assert_eq!(classify(&ApiError::validation("bad id")), FailureClass::Local);
        assert_eq!(classify(&ApiError::config("no url")), FailureClass::Local);
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!is_fallback_eligible(&ApiError::Json(json_err)));
    }
}
