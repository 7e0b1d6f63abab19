//! Request middleware that echoes the server's anti-CSRF token.
//!
//! The secrets service protects its session-authenticated endpoints with
//! the cookie-to-header pattern: at login it sets a token cookie
//! (`XSRF-TOKEN` by default) and expects every subsequent request to echo
//! the token back in a custom header (`X-XSRF-TOKEN` by default). A
//! request whose header does not match the cookie is rejected.
//!
//! [`XsrfInterceptor`] implements that echo as a pipeline stage: it scans
//! the outgoing request's `Cookie` header(s), decodes them into individual
//! cookies, and when one matches the configured token-cookie name
//! (case-insensitive) writes the configured header with the cookie's exact
//! value before the request continues down the pipeline.
//!
//! Failure policy is fail-open: token injection is best-effort and must
//! never block legitimate traffic. Undecodable cookie material is logged
//! at warning level and skipped, and the request is forwarded regardless.
//! Only the downstream call's own failure propagates.

use cookie::Cookie;
use http::Extensions;
use log::warn;
use reqwest::header::{HeaderName, HeaderValue, COOKIE};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

use crate::error::{ClientError, Result};

/// Cookie the server uses to deliver the anti-CSRF token.
pub const DEFAULT_XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header the server expects the token echoed back in.
pub const DEFAULT_XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Copies a server-issued anti-CSRF token from a request cookie into a
/// request header.
///
/// Both names are fixed at construction; the interceptor holds no other
/// state, so a single instance can serve any number of concurrent
/// requests.
///
/// When several cookies match the token name (within one `Cookie` header
/// or across repeated ones), the last match wins and exactly one header
/// instance is written.
#[derive(Debug, Clone)]
pub struct XsrfInterceptor {
    cookie_name: String,
    header_name: HeaderName,
}

impl Default for XsrfInterceptor {
    fn default() -> Self {
        XsrfInterceptor {
            cookie_name: DEFAULT_XSRF_COOKIE.to_string(),
            header_name: HeaderName::from_static("x-xsrf-token"),
        }
    }
}

impl XsrfInterceptor {
    /// Creates an interceptor with custom cookie and header names.
    ///
    /// The header name is validated here, once, rather than on every
    /// request.
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidHeaderName` when `header_name` is not a legal
    /// HTTP header name.
    pub fn new(cookie_name: &str, header_name: &str) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(header_name.as_bytes()).map_err(|_| {
                ClientError::InvalidHeaderName {
                    name: header_name.to_string(),
                }
            })?;
        Ok(XsrfInterceptor {
            cookie_name: cookie_name.to_string(),
            header_name,
        })
    }

    /// The cookie name this interceptor looks for.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// The header name this interceptor writes.
    pub fn header_name(&self) -> &str {
        self.header_name.as_str()
    }

    /// Scans the request's `Cookie` header(s) for the token cookie.
    ///
    /// Returns the value of the last matching cookie, already validated
    /// as a header value. Anything undecodable is logged and skipped so
    /// one malformed cookie cannot suppress a well-formed token elsewhere
    /// in the request.
    fn extract_token(&self, req: &Request) -> Option<HeaderValue> {
        let host = req.url().host_str().unwrap_or("<no-host>").to_string();
        let mut token = None;

        // A request may carry several Cookie headers; scan all of them.
        for raw in req.headers().get_all(COOKIE) {
            let raw = match raw.to_str() {
                Ok(s) => s,
                Err(err) => {
                    warn!("skipping non-UTF-8 Cookie header for {host}: {err}");
                    continue;
                }
            };
            for parsed in Cookie::split_parse(raw) {
                let cookie = match parsed {
                    Ok(c) => c,
                    Err(err) => {
                        warn!("skipping undecodable cookie for {host}: {err}");
                        continue;
                    }
                };
                if !cookie.name().eq_ignore_ascii_case(&self.cookie_name) {
                    continue;
                }
                match HeaderValue::from_str(cookie.value()) {
                    // Last match wins: one header slot, deterministic value.
                    Ok(value) => token = Some(value),
                    Err(err) => {
                        warn!(
                            "cookie {} for {host} is not a legal {} value: {err}",
                            self.cookie_name, self.header_name
                        );
                    }
                }
            }
        }
        token
    }
}

#[async_trait::async_trait]
impl Middleware for XsrfInterceptor {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Some(token) = self.extract_token(&req) {
            req.headers_mut().insert(self.header_name.clone(), token);
        }
        next.run(req, extensions).await
    }
}
