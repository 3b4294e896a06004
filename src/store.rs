//! PEM files on disk.
//!
//! Writes are plain `fs::write` calls: no locking, no temporary file and
//! rename. Two issuances aimed at the same path race, and a failure between
//! the certificate and key writes leaves the certificate behind.

use std::fs;
use std::path::Path;

use crate::cert::Certificate;
use crate::error::CertMintError;
use crate::key::KeyPair;
use crate::pem_utils::{self, CERTIFICATE_LABEL, PRIVATE_KEY_LABEL};

pub type Result<T> = std::result::Result<T, CertMintError>;

/// Labels accepted when reading a private key.
const KEY_LABELS: [&str; 2] = [PRIVATE_KEY_LABEL, "RSA PRIVATE KEY"];

/// Writes `cert` as a `CERTIFICATE` PEM block.
pub fn write_certificate(path: impl AsRef<Path>, cert: &Certificate) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, cert.to_pem()?)?;
    tracing::info!(path = %path.display(), "wrote certificate");
    Ok(())
}

/// Writes `key` as a PKCS#8 `PRIVATE KEY` PEM block.
pub fn write_private_key(path: impl AsRef<Path>, key: &KeyPair) -> Result<()> {
    let path = path.as_ref();
    let pem = pem_utils::der_to_pem(&key.to_pkcs8_der()?, PRIVATE_KEY_LABEL);
    fs::write(path, pem)?;
    tracing::info!(path = %path.display(), "wrote private key");
    Ok(())
}

/// Reads and parses a PEM certificate.
pub fn read_certificate(path: impl AsRef<Path>) -> Result<Certificate> {
    let pem = fs::read_to_string(path)?;
    Certificate::from_der(&pem_utils::pem_to_der(&pem, &[CERTIFICATE_LABEL])?)
}

/// Reads a PEM private key, PKCS#8 or PKCS#1.
pub fn read_private_key(path: impl AsRef<Path>) -> Result<KeyPair> {
    let pem = fs::read_to_string(path)?;
    KeyPair::import_from_der(&pem_utils::pem_to_der(&pem, &KEY_LABELS)?)
}
