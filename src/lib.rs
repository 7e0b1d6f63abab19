//! Async Rust client library for a Keywhiz-style secrets-management service.
//!
//! The service exposes two API surfaces with different authentication
//! models, and this crate covers both:
//!
//! - the **automation API**, for machine callers authenticated with a
//!   client certificate (mutual TLS);
//! - the **admin API**, for session-authenticated callers, protected by
//!   the cookie-to-header anti-CSRF pattern.
//!
//! # Modules
//!
//! - [`automation`]: mTLS client for the automation API.
//! - [`client`]: shared HTTP base with base URL handling, timeouts, and
//!   JSON helpers with body-preserving errors.
//! - [`error`]: typed error hierarchy (`ClientError`) for all library
//!   operations.
//! - [`session`]: login-based client for the admin API, with the XSRF
//!   interceptor installed.
//! - [`tls`]: client identity and server CA material, loaded from PEM.
//! - [`xsrf`]: request middleware that echoes the server's anti-CSRF
//!   token cookie into a request header.
//!
//! # Quick Start
//!
//! ```ignore
//! use keywhiz_client::automation::AutomationClient;
//! use keywhiz_client::tls::TlsIdentity;
//!
//! let identity = TlsIdentity::from_pem_files(
//!     "client.crt".as_ref(),
//!     "client.key".as_ref(),
//! )?;
//! let client = AutomationClient::new("https://secrets.example.com", identity)?;
//! let names = client.list_clients().await?;
//! ```

#![warn(missing_docs)]

pub mod automation;
pub mod client;
pub mod error;
pub mod session;
pub mod tls;
pub mod xsrf;
