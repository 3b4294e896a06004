use der::{Decode, Encode};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::CertMintError;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// Modulus size used for every key issued by this authority.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// An RSA key pair owned by a certificate subject or issuer.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertMintError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Imports a private key from DER.
    ///
    /// PKCS#8 is tried first; PKCS#1 is accepted too because older key files
    /// hold PKCS#1 bytes under a `PRIVATE KEY` label.
    pub fn import_from_der(der: &[u8]) -> Result<Self> {
        let private = match RsaPrivateKey::from_pkcs8_der(der) {
            Ok(private) => private,
            Err(_) => RsaPrivateKey::from_pkcs1_der(der)?,
        };
        Ok(Self::from_private(private))
    }

    /// Exports the private key as PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        Ok(self.private.to_pkcs8_der()?.as_bytes().to_vec())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new((*self.private).clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CertMintError::SigningError(e.to_string()))?;
        Ok(signature.to_vec())
    }
}

/// Public half of a [`KeyPair`], as placed in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    /// Builds the SubjectPublicKeyInfo carried in the TBS certificate.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let der = self.0.to_public_key_der()?;
        Ok(SubjectPublicKeyInfoOwned::from_der(der.as_bytes())?)
    }

    /// Reads an RSA public key back out of a certificate.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = spki.to_der()?;
        Ok(Self(RsaPublicKey::from_public_key_der(&der)?))
    }
}
