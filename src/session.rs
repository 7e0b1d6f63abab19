//! Session-authenticated client for the admin API.
//!
//! The admin surface (`/admin/...`) is the human-facing counterpart of
//! the automation API: callers log in with a username and password, the
//! service answers with a session cookie plus an anti-CSRF token cookie,
//! and every later request must replay the session cookie and echo the
//! token in the `X-XSRF-TOKEN` header.
//!
//! `SessionClient` wires that contract together from the shared base:
//! a cookie jar captures whatever the server sets, and the
//! [`XsrfInterceptor`](crate::xsrf::XsrfInterceptor) installed on the
//! pipeline copies the token cookie into the header on each outgoing
//! request. Callers never touch cookies or the token directly.

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::Result;
use crate::tls::ServerCa;
use crate::xsrf::XsrfInterceptor;

/// Login path on the admin API.
const LOGIN_PATH: &str = "/admin/login";

/// Logout path on the admin API.
const LOGOUT_PATH: &str = "/admin/logout";

/// JSON body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Typed client for the session-authenticated admin API.
///
/// State lives entirely in the server session and the client cookie jar;
/// the struct itself is immutable after construction, so concurrent
/// requests need no coordination.
pub struct SessionClient {
    http: HttpClient,
}

impl SessionClient {
    /// Creates a session client for the given base URL.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = HttpClient::builder(base_url)
            .cookie_store(true)
            .xsrf(XsrfInterceptor::default())
            .build()?;
        Ok(SessionClient { http })
    }

    /// Creates a session client that additionally trusts `server_ca` when
    /// verifying the service certificate.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SessionClient::new`].
    pub fn with_server_ca(base_url: &str, server_ca: ServerCa) -> Result<Self> {
        let http = HttpClient::builder(base_url)
            .cookie_store(true)
            .xsrf(XsrfInterceptor::default())
            .server_ca(server_ca)
            .build()?;
        Ok(SessionClient { http })
    }

    /// Logs in against the admin API.
    ///
    /// On success the server's `Set-Cookie` responses (session cookie and
    /// XSRF token cookie) land in the jar, and later requests through this
    /// client carry them automatically.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` when the service rejects the credentials; the
    ///   body carries the service's explanation.
    /// - `ClientError::Network` for transport failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let body = LoginRequest { username, password };
        self.http.post_json(LOGIN_PATH, Some(&body)).await?;
        Ok(())
    }

    /// Logs out, invalidating the server-side session.
    ///
    /// The jar may still hold the stale cookies afterwards; the server
    /// rejects them once the session is gone.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SessionClient::login`].
    pub async fn logout(&self) -> Result<()> {
        self.http.post_json::<()>(LOGOUT_PATH, None).await?;
        Ok(())
    }

    /// Sends a GET request to an admin path and deserializes the JSON
    /// response.
    ///
    /// Building block for admin endpoints beyond the session lifecycle;
    /// the request carries the jar's cookies and the XSRF header without
    /// caller involvement.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` for non-success statuses (including 401 once
    ///   the session expires), body preserved.
    /// - `ClientError::Parse` when the body does not match `T`.
    /// - `ClientError::Network` for transport failures.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http.get_json(path).await
    }

    /// Sends a GET request to an admin path and returns the body as text.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SessionClient::get_json`] minus `Parse`.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        self.http.get_text(path).await
    }

    /// Whether this client authenticates with a client certificate.
    ///
    /// Always `false`: the admin API authenticates with a login session.
    /// The automation client is the `true` counterpart.
    pub fn is_client_auth_enabled(&self) -> bool {
        false
    }

    /// The configured service base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}
