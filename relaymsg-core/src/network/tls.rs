//! rustls client configuration.
//!
//! Trust comes from the platform store (via `rustls-native-certs`) plus
//! any extra PEM roots the caller supplies. No pinning, no client auth.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Trust settings used to build the shared `ClientConfig`.
#[derive(Debug, Clone)]
pub struct TlsSettings {
    /// Load the operating system's trust store.
    pub native_roots: bool,
    /// Additional trust anchors, DER encoded.
    pub extra_roots: Vec<CertificateDer<'static>>,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            native_roots: true,
            extra_roots: Vec::new(),
        }
    }
}

impl TlsSettings {
    /// Platform trust store only.
    pub fn platform() -> Self {
        Self::default()
    }

    /// No platform roots; only what is added explicitly.
    pub fn empty() -> Self {
        Self {
            native_roots: false,
            extra_roots: Vec::new(),
        }
    }

    pub fn with_root(mut self, cert: CertificateDer<'static>) -> Self {
        self.extra_roots.push(cert);
        self
    }

    /// Append every certificate found in a PEM bundle.
    pub fn load_ca_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let ca_err = |source| ConfigError::CaFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(ca_err)?;
        let mut reader = BufReader::new(file);
        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ca_err)?;
        if certs.is_empty() {
            return Err(ConfigError::NoCertificates(path.to_path_buf()));
        }

        debug!("loaded {} CA certificate(s) from {}", certs.len(), path.display());
        self.extra_roots.extend(certs);
        Ok(self)
    }

    fn root_store(&self) -> Result<RootCertStore, ConfigError> {
        let mut roots = RootCertStore::empty();

        if self.native_roots {
            let native = rustls_native_certs::load_native_certs();
            for e in &native.errors {
                warn!("platform trust store: {e}");
            }
            let (added, ignored) = roots.add_parsable_certificates(native.certs);
            debug!("platform trust store: {added} root(s) added, {ignored} ignored");
        }

        for cert in &self.extra_roots {
            roots.add(cert.clone())?;
        }

        if roots.is_empty() {
            return Err(ConfigError::NoTrustRoots);
        }
        Ok(roots)
    }

    /// Build the client configuration shared by every send.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>, ConfigError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_root_certificates(self.root_store()?)
            .with_no_client_auth();
        Ok(Arc::new(config))
    }
}
