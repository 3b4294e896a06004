pub mod asn1;
pub mod extensions;
pub mod params;

use std::path::Path;

use crate::error::CertMintError;
pub type Result<T> = std::result::Result<T, CertMintError>;
use der::{Decode, Encode};
use extensions::{SubjectKeyIdentifier, ToAndFromX509Extension};
use params::{DistinguishedName, ExtensionParam, Validity};
use x509_cert::name::Name;

use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::oid::{Oid, OidError};
use crate::pem_utils::{self, CERTIFICATE_LABEL};
use crate::template::{CertificateTemplate, from_x509_time};

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl SignatureAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha256WithRSA => "sha256WithRSAEncryption",
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: None,
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// Wraps the parsed structure and exposes read-only views over it.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: asn1::Certificate,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: asn1::Certificate::from_der(der)?,
        })
    }

    /// Parses the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        Self::from_der(&pem_utils::pem_to_der(pem, &[CERTIFICATE_LABEL])?)
    }

    /// Creates a new self-signed certificate: issuer and subject are the
    /// template's subject and `key` signs its own public half.
    pub fn new_self_signed(template: &CertificateTemplate, key: &KeyPair) -> Result<Self> {
        let self_issuer = SelfIssuer {
            name: template.subject.as_x509_name()?,
            key,
        };
        self_issuer.issue(template, &key.public_key())
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(self.subject_name())
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(self.issuer_name())
    }

    /// True when the issuer name equals the subject name.
    pub fn is_self_issued(&self) -> bool {
        self.issuer_name() == self.subject_name()
    }

    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    pub fn validity(&self) -> Validity {
        let validity = &self.inner.tbs_certificate.validity;
        Validity {
            not_before: from_x509_time(&validity.not_before),
            not_after: from_x509_time(&validity.not_after),
        }
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Raw signature bits.
    pub fn signature(&self) -> &[u8] {
        self.inner.signature.raw_bytes()
    }

    fn raw_extensions(&self) -> &[asn1::Extension] {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
    }

    /// All extensions, in certificate order.
    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.raw_extensions()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id.clone(),
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect()
    }

    /// Decodes the first extension of type `E`, if present.
    pub fn find_extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let oid = Oid::from(E::OID);
        self.raw_extensions()
            .iter()
            .find(|ext| ext.extn_id == oid)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Key identifier of this certificate's public key.
    ///
    /// Taken from the Subject Key Identifier extension, or derived from the
    /// public key when the extension is missing.
    pub fn subject_key_id(&self) -> Result<SubjectKeyIdentifier> {
        match self.find_extension::<SubjectKeyIdentifier>()? {
            Some(ski) => Ok(ski),
            None => Ok(SubjectKeyIdentifier::from_public_key_bits(
                self.inner
                    .tbs_certificate
                    .subject_public_key_info
                    .subject_public_key
                    .raw_bytes(),
            )),
        }
    }

    /// Looks up a custom extension by the key it was issued with.
    ///
    /// The key is decoded the same way as at issuance and compared arc for
    /// arc against each extension in order. `Ok(None)` means no extension
    /// matched; an undecodable key is reported as an error.
    pub fn lookup_extension(&self, key: &str) -> std::result::Result<Option<&[u8]>, OidError> {
        let oid = Oid::from_key(key)?;
        Ok(self
            .raw_extensions()
            .iter()
            .find(|ext| ext.extn_id == oid)
            .map(|ext| ext.extn_value.as_bytes()))
    }

    /// Like [`Certificate::lookup_extension`], with a malformed key treated as absent.
    pub fn extension_value(&self, key: &str) -> Option<&[u8]> {
        self.lookup_extension(key).ok().flatten()
    }
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: Name,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Name {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn authority_key_id(&self) -> Result<Option<extensions::AuthorityKeyIdentifier>> {
        Ok(None)
    }
}

/// A certificate together with the private key matching its public key.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertificateWithPrivateKey {
    /// Reads a PEM certificate and its PEM private key from disk.
    pub fn load(cert_path: impl AsRef<Path>, key_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            cert: crate::store::read_certificate(cert_path)?,
            key: crate::store::read_private_key(key_path)?,
        })
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Name {
        // The name of the issuer is the subject of the certificate
        self.cert.subject_name().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn authority_key_id(&self) -> Result<Option<extensions::AuthorityKeyIdentifier>> {
        crate::issuer::authority_key_id_of(&self.cert).map(Some)
    }
}
