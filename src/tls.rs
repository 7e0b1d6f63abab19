//! Mutual-TLS material for the automation API.
//!
//! The automation surface of the secrets service authenticates callers
//! with a client certificate instead of a login session. This module
//! loads that material from PEM and hands it to the HTTP client builder:
//!
//! - [`TlsIdentity`] wraps the client certificate chain plus private key.
//! - [`ServerCa`] wraps an extra pinned root certificate, for deployments
//!   whose server certificate is issued by a private CA.
//!
//! Both types are thin wrappers over the `reqwest` TLS primitives. PEM
//! parsing and the TLS handshake itself stay inside the rustls backend;
//! this module only converts loading failures into [`ClientError::Tls`]
//! with the original cause chained for `source()` traversal.

use std::path::Path;

use crate::error::{ClientError, Result};

/// Client certificate and private key used for mutual TLS.
///
/// The wrapped identity is immutable once constructed. Cloning is cheap
/// enough for passing the same identity to several clients; the PEM bytes
/// themselves are not retained after parsing.
#[derive(Clone)]
pub struct TlsIdentity {
    inner: reqwest::Identity,
}

impl TlsIdentity {
    /// Parses an identity from a single PEM bundle containing the client
    /// certificate chain and the private key (PKCS#8, RSA, or SEC1).
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the TLS backend rejects the bundle, for
    /// example when the private key block is missing or a certificate
    /// block fails to parse.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let inner = reqwest::Identity::from_pem(pem).map_err(|err| ClientError::Tls {
            message: "failed to parse client identity PEM".to_string(),
            source: Some(Box::new(err)),
        })?;
        Ok(TlsIdentity { inner })
    }

    /// Parses an identity from separate certificate and key PEM buffers.
    ///
    /// Deployments commonly store the certificate and key as two files;
    /// the TLS backend wants one bundle, so the buffers are concatenated
    /// before parsing.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TlsIdentity::from_pem`].
    pub fn from_pem_parts(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        let mut bundle = Vec::with_capacity(cert_pem.len() + key_pem.len() + 1);
        bundle.extend_from_slice(cert_pem);
        // A missing trailing newline on the certificate file would glue
        // the two PEM blocks together and break parsing.
        if !cert_pem.ends_with(b"\n") {
            bundle.push(b'\n');
        }
        bundle.extend_from_slice(key_pem);
        Self::from_pem(&bundle)
    }

    /// Reads the certificate and key from PEM files on disk.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` naming the unreadable path, or the parse
    /// failures of [`TlsIdentity::from_pem`].
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert_pem = read_pem(cert_path)?;
        let key_pem = read_pem(key_path)?;
        Self::from_pem_parts(&cert_pem, &key_pem)
    }

    /// Consumes the wrapper, yielding the identity for the HTTP client
    /// builder.
    pub(crate) fn into_identity(self) -> reqwest::Identity {
        self.inner
    }
}

impl std::fmt::Debug for TlsIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never leak through Debug output.
        f.debug_struct("TlsIdentity").finish_non_exhaustive()
    }
}

/// Additional root certificate trusted when verifying the server.
#[derive(Clone)]
pub struct ServerCa {
    inner: reqwest::Certificate,
}

impl ServerCa {
    /// Parses a root certificate from PEM.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` when the certificate block fails to parse.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let inner = reqwest::Certificate::from_pem(pem).map_err(|err| ClientError::Tls {
            message: "failed to parse server CA PEM".to_string(),
            source: Some(Box::new(err)),
        })?;
        Ok(ServerCa { inner })
    }

    /// Reads a root certificate from a PEM file on disk.
    ///
    /// # Errors
    ///
    /// `ClientError::Tls` naming the unreadable path, or the parse
    /// failure of [`ServerCa::from_pem`].
    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let pem = read_pem(path)?;
        Self::from_pem(&pem)
    }

    /// Consumes the wrapper, yielding the certificate for the HTTP client
    /// builder.
    pub(crate) fn into_certificate(self) -> reqwest::Certificate {
        self.inner
    }
}

impl std::fmt::Debug for ServerCa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerCa").finish_non_exhaustive()
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| ClientError::Tls {
        message: format!("failed to read {}", path.display()),
        source: Some(Box::new(err)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    // Self-signed certificate plus PKCS#8 key generated for tests only.
    const CLIENT_PEM: &[u8] = include_bytes!("../tests/fixtures/client.pem");
    const CA_PEM: &[u8] = include_bytes!("../tests/fixtures/ca.pem");

    #[test]
    fn identity_parses_combined_pem_bundle() {
        assert!(
            TlsIdentity::from_pem(CLIENT_PEM).is_ok(),
            "certificate + key bundle should parse"
        );
    }

    #[test]
    fn identity_rejects_pem_without_private_key() {
        // The CA fixture is a bare certificate; an identity needs a key.
        let result = TlsIdentity::from_pem(CA_PEM);
        assert!(
            matches!(result, Err(ClientError::Tls { .. })),
            "certificate-only PEM must not produce an identity"
        );
    }

    #[test]
    fn identity_rejects_garbage_input() {
        let result = TlsIdentity::from_pem(b"not pem at all");
        assert!(matches!(result, Err(ClientError::Tls { .. })));
    }

    #[test]
    fn identity_from_missing_file_names_the_path() {
        let missing = Path::new("/nonexistent/client.pem");
        let err = TlsIdentity::from_pem_files(missing, missing).unwrap_err();
        assert!(
            err.to_string().contains("/nonexistent/client.pem"),
            "error should name the unreadable path, got: {err}"
        );
        assert!(err.source().is_some(), "I/O cause should be chained");
    }

    #[test]
    fn server_ca_parses_certificate_pem() {
        assert!(ServerCa::from_pem(CA_PEM).is_ok());
    }

    #[test]
    fn server_ca_rejects_garbage_input() {
        let result = ServerCa::from_pem(b"-----BEGIN NONSENSE-----");
        assert!(matches!(result, Err(ClientError::Tls { .. })));
    }

    #[test]
    fn debug_output_does_not_expose_material() {
        let identity = TlsIdentity::from_pem(CLIENT_PEM).unwrap();
        let rendered = format!("{identity:?}");
        assert!(
            !rendered.contains("PRIVATE KEY"),
            "Debug must not render key material"
        );
    }
}
