use serde::{Deserialize, Serialize};

/// Unified error type for all Porkbun API operations.
///
/// The variants separate local precondition failures from remote-reported
/// conditions so callers can handle them differently:
///
/// - [`Configuration`](Self::Configuration) and [`Validation`](Self::Validation)
///   are raised locally, before any network I/O, and are fixed by correcting
///   input. They are never retried.
/// - [`Api`](Self::Api) means the transport succeeded but the upstream reported
///   a non-success HTTP status. It carries the upstream's own `status` and
///   `message` strings verbatim and is never retried by this library.
/// - [`ApiFailure`](Self::ApiFailure) means the upstream returned a body that
///   is not valid JSON (outage, proxy error page). Even the error-reporting
///   contract failed, so this is treated as more severe than [`Api`](Self::Api).
/// - [`Network`](Self::Network) and [`Timeout`](Self::Timeout) are transport
///   failures, reported only after the configured retry count is exhausted.
///
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PorkbunError {
    /// Credentials were missing or empty after resolving every configuration
    /// source. Fatal to client construction.
    Configuration {
        /// What was wrong with the resolved configuration.
        detail: String,
    },

    /// A caller-supplied argument failed a local precondition (unsupported
    /// record type, missing addressing mode, empty edit). Raised before any
    /// network call.
    Validation {
        /// Name of the offending parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The upstream API reported an error for a successfully transported
    /// request.
    ///
    /// One known, expected instance: the SSL retrieve endpoint reports the
    /// certificate as not ready while issuance is still in progress. Callers
    /// should treat that case as "retry later", not a hard failure.
    Api {
        /// HTTP status code returned by the API.
        http_status: u16,
        /// Upstream status string (normally `"ERROR"`).
        status: String,
        /// Upstream message explaining the error cause.
        message: String,
    },

    /// The response body could not be decoded as JSON, or a decoded body did
    /// not match the documented payload shape.
    ApiFailure {
        /// HTTP status code returned by the API.
        http_status: u16,
        /// Raw body content (truncated in logs, complete here).
        body: String,
    },

    /// A network-level failure (DNS resolution, connection refused, TLS).
    ///
    /// Transient; the executor retries these up to the configured fixed count.
    Network {
        /// Error details from the transport.
        detail: String,
    },

    /// The request exceeded the configured timeout.
    ///
    /// Transient; the executor retries these up to the configured fixed count.
    Timeout {
        /// Error details from the transport.
        detail: String,
    },
}

impl PorkbunError {
    /// Whether this error is a transport-level failure that may succeed on
    /// retry. API-level errors and local validation failures are not
    /// transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for PorkbunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration { detail } => {
                write!(f, "Configuration error: {detail}")
            }
            Self::Validation { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::Api {
                http_status,
                status,
                message,
            } => {
                write!(f, "API error (HTTP {http_status}, {status}): {message}")
            }
            Self::ApiFailure { http_status, .. } => {
                write!(f, "API failure (HTTP {http_status}): non-JSON response")
            }
            Self::Network { detail } => {
                write!(f, "Network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "Request timeout: {detail}")
            }
        }
    }
}

impl std::error::Error for PorkbunError {}

/// Convenience type alias for `Result<T, PorkbunError>`.
pub type Result<T> = std::result::Result<T, PorkbunError>;
