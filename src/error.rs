//! Error types shared by every module.

use thiserror::Error;

use crate::oid::OidError;

/// Represents errors that can occur in the CertMint library.
///
/// Decoder failures keep their own type ([`OidError`]) and I/O failures are
/// carried through unchanged; everything coming out of the encoding and
/// crypto crates is flattened into a message.
#[derive(Debug, Error)]
pub enum CertMintError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing a signature.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),

    /// Error from PKCS8 or SPKI key encoding.
    #[error("PKCS8 error: {0}")]
    Pkcs8Error(String),

    /// Custom extension key could not be decoded.
    #[error(transparent)]
    Oid(#[from] OidError),

    /// Reading or writing a certificate or key file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<der::Error> for CertMintError {
    /// Converts a `der::Error` into a `CertMintError`.
    fn from(err: der::Error) -> Self {
        CertMintError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertMintError {
    fn from(err: pem::PemError) -> Self {
        CertMintError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertMintError {
    fn from(err: rsa::Error) -> Self {
        CertMintError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertMintError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertMintError::RsaPkcs1Error(err.to_string())
    }
}

impl From<pkcs8::Error> for CertMintError {
    fn from(err: pkcs8::Error) -> Self {
        CertMintError::Pkcs8Error(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CertMintError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CertMintError::Pkcs8Error(err.to_string())
    }
}
