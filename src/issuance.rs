//! The issuance engine: generate a key, pick the signer, persist the result.

use bon::Builder;

use crate::cert::params::CertInformation;
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::CertMintError;
use crate::issuer::{ChainIssuer, Issuer};
use crate::key::{DEFAULT_RSA_BITS, KeyPair};
use crate::serial::SerialSource;
use crate::store;
use crate::template::{CertificateTemplate, RejectedExtension};

pub type Result<T> = std::result::Result<T, CertMintError>;

/// Issues certificates, owning the serial source used for every one of them.
///
/// ```rust,no_run
/// use certmint::cert::params::{CertInformation, DistinguishedName};
/// use certmint::issuance::IssuanceEngine;
///
/// # fn main() -> Result<(), certmint::error::CertMintError> {
/// let mut engine = IssuanceEngine::builder().build();
/// let root = CertInformation::builder()
///     .subject(DistinguishedName::builder().common_name("Work-Stacks".to_string()).build())
///     .is_ca(true)
///     .cert_path("root.crt")
///     .key_path("root.key")
///     .build();
/// let root = engine.issue(None, None, &root)?;
/// println!("{}", root.certificate.cert.to_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Builder)]
pub struct IssuanceEngine {
    /// Modulus size of generated subject keys.
    #[builder(default = DEFAULT_RSA_BITS)]
    rsa_bits: usize,
    #[builder(default)]
    serials: SerialSource,
}

impl Default for IssuanceEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Result of one issuance.
#[derive(Debug)]
pub struct Issued {
    /// The signed certificate and the freshly generated subject key.
    pub certificate: CertificateWithPrivateKey,
    /// Custom extension keys that were skipped.
    pub rejected_extensions: Vec<RejectedExtension>,
}

impl IssuanceEngine {
    /// Issues a certificate without touching the filesystem.
    ///
    /// With both `parent_cert` and `parent_key` the result is signed by the
    /// parent; if either is missing it is a self-signed root.
    pub fn issue_certificate(
        &mut self,
        parent_cert: Option<&Certificate>,
        parent_key: Option<&KeyPair>,
        info: &CertInformation,
    ) -> Result<Issued> {
        let template = CertificateTemplate::from_info(info, &mut self.serials);
        let key = KeyPair::generate_rsa(self.rsa_bits)?;

        let cert = match (parent_cert, parent_key) {
            (Some(cert), Some(parent_key)) => {
                tracing::debug!(
                    subject = %template.subject,
                    issuer = %cert.subject(),
                    "issuing chain-signed certificate"
                );
                ChainIssuer {
                    cert,
                    key: parent_key,
                }
                .issue(&template, &key.public_key())?
            }
            _ => {
                tracing::debug!(subject = %template.subject, "issuing self-signed certificate");
                Certificate::new_self_signed(&template, &key)?
            }
        };

        Ok(Issued {
            certificate: CertificateWithPrivateKey { cert, key },
            rejected_extensions: template.rejected_extensions,
        })
    }

    /// Issues a certificate and writes it, then its private key, to the
    /// destinations named in `info`.
    ///
    /// A failed key write leaves the certificate file in place.
    pub fn issue(
        &mut self,
        parent_cert: Option<&Certificate>,
        parent_key: Option<&KeyPair>,
        info: &CertInformation,
    ) -> Result<Issued> {
        let issued = self.issue_certificate(parent_cert, parent_key, info)?;
        store::write_certificate(&info.cert_path, &issued.certificate.cert)?;
        store::write_private_key(&info.key_path, &issued.certificate.key)?;
        Ok(issued)
    }

    /// Issues a certificate signed by `parent` and writes it out.
    pub fn issue_from(
        &mut self,
        parent: &CertificateWithPrivateKey,
        info: &CertInformation,
    ) -> Result<Issued> {
        self.issue(Some(&parent.cert), Some(&parent.key), info)
    }
}
