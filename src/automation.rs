//! Client for the mutually-authenticated automation API.
//!
//! The automation surface (`/automation/v2/...`) is meant for machine
//! callers: authentication happens in the TLS handshake via a client
//! certificate, so there is no login, no session cookie, and no XSRF
//! token anywhere on this path.
//!
//! Calls are one network round trip each, with no retries and no caching.
//! The response is re-fetched from the service on every call.

use crate::client::HttpClient;
use crate::error::Result;
use crate::tls::{ServerCa, TlsIdentity};

/// Path listing the registered automation clients.
const CLIENTS_PATH: &str = "/automation/v2/clients";

/// Typed client for the automation API.
///
/// Requires a [`TlsIdentity`] so the service can authenticate the caller
/// from its certificate. The certificate's common name must be registered
/// with the service as an automation client, otherwise calls fail with a
/// 403 and the service's explanation in the error body.
pub struct AutomationClient {
    http: HttpClient,
}

impl AutomationClient {
    /// Creates an automation client for the given base URL, presenting
    /// `identity` during the TLS handshake.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the HTTP client cannot be built from the
    /// supplied material.
    pub fn new(base_url: &str, identity: TlsIdentity) -> Result<Self> {
        let http = HttpClient::builder(base_url).identity(identity).build()?;
        Ok(AutomationClient { http })
    }

    /// Creates an automation client that additionally trusts `server_ca`
    /// when verifying the service certificate. Needed when the service
    /// runs under a private CA.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AutomationClient::new`].
    pub fn with_server_ca(
        base_url: &str,
        identity: TlsIdentity,
        server_ca: ServerCa,
    ) -> Result<Self> {
        let http = HttpClient::builder(base_url)
            .identity(identity)
            .server_ca(server_ca)
            .build()?;
        Ok(AutomationClient { http })
    }

    /// Constructor without a client identity, used by tests to point at a
    /// plain-HTTP mock server. Production callers use
    /// [`AutomationClient::new`]; the real service rejects unauthenticated
    /// automation calls at the TLS layer.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = HttpClient::builder(base_url).build()?;
        Ok(AutomationClient { http })
    }

    /// Lists the identifiers of all registered automation clients.
    ///
    /// Issues one `GET /automation/v2/clients` and returns the service's
    /// JSON array of strings in its original order.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` for a non-success status, body preserved.
    /// - `ClientError::Parse` when the body is not a JSON array of
    ///   strings.
    /// - `ClientError::Network` for transport failures.
    pub async fn list_clients(&self) -> Result<Vec<String>> {
        self.http.get_json(CLIENTS_PATH).await
    }

    /// Whether this client authenticates with a client certificate.
    ///
    /// Always `true`: the automation API has no session-based access
    /// path. The session client is the `false` counterpart.
    pub fn is_client_auth_enabled(&self) -> bool {
        true
    }

    /// The configured service base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_auth_is_always_enabled() {
        let client = AutomationClient::with_base_url("http://localhost:4000").unwrap();
        assert!(
            client.is_client_auth_enabled(),
            "automation clients authenticate via mTLS by definition"
        );
    }

    #[test]
    fn construction_with_identity_succeeds() {
        let identity =
            TlsIdentity::from_pem(include_bytes!("../tests/fixtures/client.pem")).unwrap();
        let client = AutomationClient::new("https://secrets.example.com", identity).unwrap();
        assert_eq!(client.base_url(), "https://secrets.example.com");
    }

    #[test]
    fn construction_with_private_ca_succeeds() {
        let identity =
            TlsIdentity::from_pem(include_bytes!("../tests/fixtures/client.pem")).unwrap();
        let ca = ServerCa::from_pem(include_bytes!("../tests/fixtures/ca.pem")).unwrap();
        let client =
            AutomationClient::with_server_ca("https://secrets.example.com", identity, ca).unwrap();
        assert!(client.is_client_auth_enabled());
    }
}
