//! Mutual TLS client configuration.
//!
//! Turns the three PEM paths from the connection settings into a rustls client
//! config that presents the client certificate and trusts only the given CA.

use std::{fs, sync::Arc};

use rustls::{ClientConfig, RootCertStore, crypto::ring};

use crate::error::SecurityError;

/// Ready-to-use TLS client configuration.
pub type SecureContext = Arc<ClientConfig>;

const CLIENT_CERT: &str = "client certificate";
const CLIENT_KEY: &str = "client key";
const CA_CERT: &str = "CA certificate";

/// Build a TLS 1.2+ client configuration with client authentication.
///
/// # Errors
///
/// - [`SecurityError::Read`] if any file cannot be read
/// - [`SecurityError::Parse`] if a file holds no usable PEM entries
/// - [`SecurityError::Config`] if rustls rejects the certificate/key pair
pub fn build_transport_security(
    cert_path: &str,
    key_path: &str,
    ca_path: &str,
) -> Result<SecureContext, SecurityError> {
    let cert_pem = read(CLIENT_CERT, cert_path)?;
    let chain = rustls_pemfile::certs(&mut &cert_pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| parse_err(CLIENT_CERT, cert_path, &e.to_string()))?;
    if chain.is_empty() {
        return Err(parse_err(CLIENT_CERT, cert_path, "no certificates found"));
    }

    let key_pem = read(CLIENT_KEY, key_path)?;
    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|e| parse_err(CLIENT_KEY, key_path, &e.to_string()))?
        .ok_or_else(|| parse_err(CLIENT_KEY, key_path, "no private key found"))?;

    let ca_pem = read(CA_CERT, ca_path)?;
    let ca_certs = rustls_pemfile::certs(&mut &ca_pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| parse_err(CA_CERT, ca_path, &e.to_string()))?;
    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(ca_certs);
    if added == 0 {
        return Err(parse_err(CA_CERT, ca_path, "no valid certificates found"));
    }
    if ignored > 0 {
        tracing::warn!(path = ca_path, ignored, "skipped unparsable CA certificates");
    }

    let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| SecurityError::Config(e.to_string()))?
        .with_root_certificates(roots)
        .with_client_auth_cert(chain, key)
        .map_err(|e| SecurityError::Config(e.to_string()))?;

    tracing::debug!(cert = cert_path, ca = ca_path, roots = added, "built TLS client config");
    Ok(Arc::new(config))
}

fn read(what: &'static str, path: &str) -> Result<Vec<u8>, SecurityError> {
    fs::read(path).map_err(|e| SecurityError::Read {
        what,
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn parse_err(what: &'static str, path: &str, reason: &str) -> SecurityError {
    SecurityError::Parse { what, path: path.to_string(), reason: reason.to_string() }
}
