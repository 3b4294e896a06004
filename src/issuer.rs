use der::Encode;
use x509_cert::name::Name;

use crate::cert::asn1;
use crate::cert::extensions::AuthorityKeyIdentifier;
use crate::cert::{Certificate, SignatureAlgorithm};
use crate::error::CertMintError;
use crate::key::{KeyPair, PublicKey};
use crate::template::CertificateTemplate;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the distinguished name written into the issuer field.
    fn issuer_name(&self) -> Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the identifier linking issued certificates back to this issuer,
    /// or `None` when the certificate signs itself.
    fn authority_key_id(&self) -> Result<Option<AuthorityKeyIdentifier>>;

    /// Signs `template` for the holder of `subject_public_key`.
    ///
    /// DER encoding and the signature itself are delegated to the encoding and
    /// RSA crates; this only wires the template, issuer, and key together.
    fn issue(
        &self,
        template: &CertificateTemplate,
        subject_public_key: &PublicKey,
    ) -> Result<Certificate> {
        let authority_key_id = self.authority_key_id()?;
        let tbs_cert_inner = template.to_tbs_certificate_inner(
            self.issuer_name(),
            subject_public_key,
            authority_key_id.as_ref(),
        )?;

        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))?;
        let signature = self.signing_key().sign_data(&tbs_der)?;

        let cert_inner = asn1::Certificate {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: SignatureAlgorithm::Sha256WithRSA.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// A parent certificate and its key, borrowed for the length of one issuance.
pub struct ChainIssuer<'a> {
    pub cert: &'a Certificate,
    pub key: &'a KeyPair,
}

impl Issuer for ChainIssuer<'_> {
    fn issuer_name(&self) -> Name {
        self.cert.subject_name().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn authority_key_id(&self) -> Result<Option<AuthorityKeyIdentifier>> {
        authority_key_id_of(self.cert).map(Some)
    }
}

/// The authority key identifier a certificate hands down to the ones it signs.
pub(crate) fn authority_key_id_of(cert: &Certificate) -> Result<AuthorityKeyIdentifier> {
    Ok(AuthorityKeyIdentifier {
        key_identifier: cert.subject_key_id()?.0,
    })
}
