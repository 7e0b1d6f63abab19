//! Shared HTTP plumbing for the secrets-service clients.
//!
//! `HttpClient` wraps a `reqwest_middleware::ClientWithMiddleware` and the
//! service base URL, providing JSON-based request helpers with
//! body-preserving error reporting. The two public clients sit on top of
//! it with opposite transport configurations:
//!
//! - [`crate::automation::AutomationClient`]: client-certificate identity,
//!   no cookie jar, no interceptor.
//! - [`crate::session::SessionClient`]: cookie jar plus the XSRF
//!   interceptor, no client certificate.
//!
//! Error bodies are read before the status check. The service explains
//! permission and validation failures in the response body, and
//! `error_for_status()` would discard that text.
//!
//! Cookie replay is handled here rather than left to the inner client:
//! the middleware pipeline runs before the inner client would consult its
//! jar, so a jar-managed `Cookie` header attached there would be
//! invisible to the XSRF interceptor. The request helpers attach the
//! jar's cookies up front; the inner client leaves an existing `Cookie`
//! header untouched.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::COOKIE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::tls::{ServerCa, TlsIdentity};
use crate::xsrf::XsrfInterceptor;

/// Connect timeout for service calls. Covers TCP plus the TLS handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout, covering the full round trip. Service
/// responses are small JSON documents; anything slower than this is a
/// stuck connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base HTTP client shared by the automation and session clients.
///
/// `base_url` is stored without a trailing slash and request paths are
/// absolute (`/automation/v2/clients`), so URL assembly is plain
/// concatenation. Storing it as a `String` rather than a constant lets
/// tests point the client at a local mock server.
pub struct HttpClient {
    http: reqwest_middleware::ClientWithMiddleware,
    base_url: String,
    jar: Option<Arc<Jar>>,
}

impl HttpClient {
    /// Starts a builder for the given service base URL.
    pub fn builder(base_url: &str) -> HttpClientBuilder {
        HttpClientBuilder {
            base_url: base_url.trim_end_matches('/').to_string(),
            identity: None,
            server_ca: None,
            cookie_store: false,
            xsrf: None,
        }
    }

    /// The configured service base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET request and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` for a non-success status, with the body text
    ///   preserved.
    /// - `ClientError::Network` for transport failures.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let req = self.attach_cookies(self.http.get(&url), &url);
        let response = req.send().await?;
        read_success_body(response).await
    }

    /// Sends a GET request and deserializes the JSON response body.
    ///
    /// # Errors
    ///
    /// The failures of [`HttpClient::get_text`], plus `ClientError::Parse`
    /// when the body is not valid JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get_text(path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Sends a POST request with an optional JSON body and returns the
    /// response body as text.
    ///
    /// `body` is serialized as JSON when present and omitted entirely for
    /// bodyless posts (for example logout).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`HttpClient::get_text`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.attach_cookies(self.http.post(&url), &url);
        if let Some(payload) = body {
            req = req.json(payload);
        }
        let response = req.send().await?;
        read_success_body(response).await
    }

    /// Attaches the jar's cookies for `url` as a `Cookie` header, so the
    /// middleware pipeline sees them. No-op without a jar or without
    /// stored cookies for this URL.
    fn attach_cookies(
        &self,
        req: reqwest_middleware::RequestBuilder,
        url: &str,
    ) -> reqwest_middleware::RequestBuilder {
        let Some(jar) = &self.jar else {
            return req;
        };
        let Ok(parsed) = Url::parse(url) else {
            // An unparseable URL fails in the transport with its own
            // diagnostics; nothing useful to attach here.
            return req;
        };
        match jar.cookies(&parsed) {
            Some(cookies) => req.header(COOKIE, cookies),
            None => req,
        }
    }
}

/// Reads the body first, then maps non-success statuses to
/// `ClientError::Api` so the service's diagnostic text survives.
async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Api { status, body });
    }
    Ok(body)
}

/// Configures and builds an [`HttpClient`].
///
/// Each client type picks the options that match its authentication
/// model; nothing here is mandatory except the base URL.
pub struct HttpClientBuilder {
    base_url: String,
    identity: Option<TlsIdentity>,
    server_ca: Option<ServerCa>,
    cookie_store: bool,
    xsrf: Option<XsrfInterceptor>,
}

impl HttpClientBuilder {
    /// Presents a client certificate during the TLS handshake.
    pub fn identity(mut self, identity: TlsIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Trusts an additional root certificate when verifying the server.
    pub fn server_ca(mut self, ca: ServerCa) -> Self {
        self.server_ca = Some(ca);
        self
    }

    /// Keeps server cookies in a jar and replays them on later requests.
    pub fn cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }

    /// Installs an XSRF interceptor on the request pipeline.
    pub fn xsrf(mut self, interceptor: XsrfInterceptor) -> Self {
        self.xsrf = Some(interceptor);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the underlying HTTP client cannot be
    /// constructed; with validated inputs this only happens for TLS
    /// backend initialization failures.
    pub fn build(self) -> Result<HttpClient> {
        let jar = self.cookie_store.then(|| Arc::new(Jar::default()));

        let mut builder = Client::builder()
            .use_rustls_tls()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT);
        if let Some(jar) = &jar {
            // The jar records Set-Cookie responses; replay on outgoing
            // requests happens in attach_cookies.
            builder = builder.cookie_provider(Arc::clone(jar));
        }
        if let Some(identity) = self.identity {
            builder = builder.identity(identity.into_identity());
        }
        if let Some(ca) = self.server_ca {
            builder = builder.add_root_certificate(ca.into_certificate());
        }
        let client = builder.build().map_err(|err| ClientError::Tls {
            message: "failed to build HTTP client".to_string(),
            source: Some(Box::new(err)),
        })?;

        let mut middleware = reqwest_middleware::ClientBuilder::new(client);
        if let Some(xsrf) = self.xsrf {
            middleware = middleware.with(xsrf);
        }
        Ok(HttpClient {
            http: middleware.build(),
            base_url: self.base_url,
            jar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_strips_trailing_slash_from_base_url() {
        let client = HttpClient::builder("https://secrets.example.com/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://secrets.example.com");
    }

    #[test]
    fn builder_keeps_base_url_without_trailing_slash() {
        let client = HttpClient::builder("https://secrets.example.com")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://secrets.example.com");
    }

    #[test]
    fn builder_accepts_full_transport_configuration() {
        let identity =
            TlsIdentity::from_pem(include_bytes!("../tests/fixtures/client.pem")).unwrap();
        let ca = ServerCa::from_pem(include_bytes!("../tests/fixtures/ca.pem")).unwrap();
        let result = HttpClient::builder("https://secrets.example.com")
            .identity(identity)
            .server_ca(ca)
            .cookie_store(true)
            .xsrf(XsrfInterceptor::default())
            .build();
        assert!(result.is_ok(), "fully configured client should build");
    }

    #[test]
    fn jar_cookies_replay_through_attach_cookies() {
        let client = HttpClient::builder("https://secrets.example.com")
            .cookie_store(true)
            .build()
            .unwrap();
        let url = Url::parse("https://secrets.example.com/admin/secrets").unwrap();
        client
            .jar
            .as_ref()
            .unwrap()
            .add_cookie_str("XSRF-TOKEN=tok-1; Path=/", &url);

        let replayed = client.jar.as_ref().unwrap().cookies(&url);
        assert_eq!(
            replayed.unwrap().to_str().unwrap(),
            "XSRF-TOKEN=tok-1",
            "stored cookies must replay for the same origin"
        );
    }
}
