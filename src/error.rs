//! Typed error hierarchy for the keywhiz-client crate.
//!
//! `ClientError` is a structured enum that preserves diagnostic context at
//! each failure boundary. Every variant carries enough information for
//! callers to:
//! - Distinguish the failure category (TLS material, API, parse, network).
//! - Inspect the original cause via `source()` (thiserror derives this
//!   from `#[source]` and `#[from]` fields).
//! - Display a human-readable message that includes the relevant context
//!   (status code, response body, offending header name).
//!
//! Variants map to real system boundaries, not to internal implementation
//! details. `Tls` covers loading client identity and CA material; `Api`
//! covers non-success responses from the secrets service; `Network` wraps
//! transport failures that never produced a status code.
//!
//! Cookie-extraction failures inside the XSRF interceptor are deliberately
//! absent from this taxonomy: the interceptor recovers them locally
//! (warning log, request forwarded unmodified) and never fails the
//! pipeline for them.

use reqwest::StatusCode;

/// Unified error type for all keywhiz-client library operations.
///
/// Each variant corresponds to a distinct failure boundary. The `#[source]`
/// attribute on inner errors enables `Error::source()` chaining so callers
/// and logging frameworks can traverse the full cause chain.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Loading TLS material (client identity or server CA) failed.
    ///
    /// This covers unreadable PEM files, PEM bundles the TLS backend
    /// rejects (missing private key, garbage certificate blocks), and
    /// HTTP client construction failures caused by bad TLS configuration.
    #[error("TLS configuration failed: {message}")]
    Tls {
        /// Human-readable description of what failed, including the file
        /// path when material was loaded from disk.
        message: String,
        /// The underlying I/O or TLS backend error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The secrets service returned a non-success HTTP status code.
    ///
    /// The full response body is preserved rather than discarded by
    /// `error_for_status()`: the service reports permission and validation
    /// problems in the body, and that text is essential for debugging.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by the service.
        status: StatusCode,
        /// The raw response body text. May be empty if the body could not
        /// be read.
        body: String,
    },

    /// JSON deserialization failed when parsing an API response body.
    ///
    /// Occurs when the service returns an unexpected response shape, for
    /// example an error page where a JSON array was expected.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A network-level failure occurred (DNS resolution, TCP connection,
    /// TLS handshake, request timeout).
    ///
    /// No HTTP status code is available because the request did not
    /// complete. Wraps the underlying `reqwest::Error`, which carries
    /// detailed transport diagnostics.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A request pipeline stage failed the request before it reached the
    /// transport.
    ///
    /// The XSRF interceptor in this crate never produces this (it is
    /// fail-open); the variant exists for other middleware a consumer may
    /// install on the same pipeline.
    #[error("request middleware error: {0}")]
    Middleware(#[source] anyhow::Error),

    /// An interceptor was configured with a string that is not a legal
    /// HTTP header name.
    #[error("invalid header name {name:?}")]
    InvalidHeaderName {
        /// The offending header name as supplied by the caller.
        name: String,
    },
}

impl From<reqwest_middleware::Error> for ClientError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => ClientError::Network(e),
            reqwest_middleware::Error::Middleware(e) => ClientError::Middleware(e),
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ClientError>;
