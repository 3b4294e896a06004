//! Certificate templates: everything that goes into a TBS certificate except
//! who signs it.

use der::asn1::OctetString;
use x509_cert::Version;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::asn1::{Extension, TbsCertificate};
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage,
    KeyUsages, SubjectAltName, SubjectKeyIdentifier, ToAndFromX509Extension,
};
use crate::cert::params::{
    CertInformation, DistinguishedName, ExtensionParam, VALIDITY_YEARS, Validity,
};
use crate::error::CertMintError;
use crate::key::PublicKey;
use crate::oid::Oid;
use crate::serial::SerialSource;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// A custom extension key that was left out of a template.
#[derive(Debug)]
pub struct RejectedExtension {
    pub key: String,
    pub reason: CertMintError,
}

/// The signing-ready description of one certificate.
///
/// Built once per issuance from a [`CertInformation`] and consumed by an
/// [`crate::issuer::Issuer`].
#[derive(Debug)]
pub struct CertificateTemplate {
    /// Certificate serial number, minimal big-endian bytes
    pub serial_number: Vec<u8>,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub is_ca: bool,
    pub key_usage: KeyUsage,
    pub extended_key_usage: ExtendedKeyUsage,
    pub email_addresses: Vec<String>,
    /// Caller-defined extensions, always critical
    pub custom_extensions: Vec<ExtensionParam>,
    /// Keys that could not be turned into extensions
    pub rejected_extensions: Vec<RejectedExtension>,
}

impl CertificateTemplate {
    /// Builds a template from caller input.
    ///
    /// A custom key that fails to decode or collides with an extension already
    /// in the template is logged, recorded in `rejected_extensions`, and
    /// skipped. It never fails the whole template.
    pub fn from_info(info: &CertInformation, serials: &mut SerialSource) -> Self {
        let mut template = Self {
            serial_number: serials.next_serial(),
            subject: info.subject.clone(),
            validity: Validity::for_years(VALIDITY_YEARS),
            is_ca: info.is_ca,
            key_usage: KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign),
            extended_key_usage: ExtendedKeyUsage {
                usage: vec![
                    ExtendedKeyUsageOption::ClientAuth,
                    ExtendedKeyUsageOption::ServerAuth,
                ],
            },
            email_addresses: info.email_addresses.clone(),
            custom_extensions: Vec::new(),
            rejected_extensions: Vec::new(),
        };

        for (key, value) in &info.extensions {
            if let Err(reason) = template.add_custom_extension(key, value) {
                tracing::warn!(key = %key, error = %reason, "skipping custom extension");
                template.rejected_extensions.push(RejectedExtension {
                    key: key.clone(),
                    reason,
                });
            }
        }

        template
    }

    fn add_custom_extension(&mut self, key: &str, value: &str) -> Result<()> {
        let oid = Oid::from_key(key)?;
        let taken = [
            BasicConstraints::OID,
            KeyUsage::OID,
            ExtendedKeyUsage::OID,
            SubjectKeyIdentifier::OID,
            AuthorityKeyIdentifier::OID,
            SubjectAltName::OID,
        ];
        if taken.into_iter().any(|standard| Oid::from(standard) == oid) || self.custom_extensions.iter().any(|ext| ext.oid == oid) {
            return Err(CertMintError::InvalidInput(format!(
                "extension {oid} is already present"
            )));
        }
        self.custom_extensions.push(ExtensionParam {
            oid,
            critical: true,
            value: value.as_bytes().to_vec(),
        });
        Ok(())
    }

    /// Lists every extension in the order they are encoded.
    pub fn extensions(
        &self,
        subject_key_id: &SubjectKeyIdentifier,
        authority_key_id: Option<&AuthorityKeyIdentifier>,
    ) -> Result<Vec<ExtensionParam>> {
        let mut extensions = vec![
            ExtensionParam::from_extension(
                BasicConstraints {
                    is_ca: self.is_ca,
                    max_path_length: None,
                },
                true,
            )?,
            ExtensionParam::from_extension(self.key_usage, true)?,
            ExtensionParam::from_extension(self.extended_key_usage.clone(), false)?,
            ExtensionParam::from_extension(subject_key_id.clone(), false)?,
        ];
        if let Some(aki) = authority_key_id {
            extensions.push(ExtensionParam::from_extension(aki.clone(), false)?);
        }
        if !self.email_addresses.is_empty() {
            let san = SubjectAltName {
                email_addresses: self.email_addresses.clone(),
            };
            extensions.push(ExtensionParam::from_extension(san, false)?);
        }
        extensions.extend(self.custom_extensions.iter().cloned());
        Ok(extensions)
    }

    /// Converts the template into a `TbsCertificate` for DER encoding.
    pub fn to_tbs_certificate_inner(
        &self,
        issuer: Name,
        subject_public_key: &PublicKey,
        authority_key_id: Option<&AuthorityKeyIdentifier>,
    ) -> Result<TbsCertificate> {
        let subject_public_key_info = subject_public_key.as_spki()?;
        let subject_key_id = SubjectKeyIdentifier::from_public_key_bits(
            subject_public_key_info.subject_public_key.raw_bytes(),
        );

        let extensions = self
            .extensions(&subject_key_id, authority_key_id)?
            .into_iter()
            .map(|ext| -> Result<Extension> {
                Ok(Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        Ok(TbsCertificate {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial_number)?,
            signature: SignatureAlgorithm::Sha256WithRSA.into(),
            issuer,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }
}

/// UTCTime through 2049, GeneralizedTime after.
fn to_x509_time(at: time::OffsetDateTime) -> Result<Time> {
    let system_time: std::time::SystemTime = at.into();
    if at.year() < 2050 {
        Ok(Time::UtcTime(der::asn1::UtcTime::from_system_time(
            system_time,
        )?))
    } else {
        Ok(Time::GeneralTime(
            der::asn1::GeneralizedTime::from_system_time(system_time)?,
        ))
    }
}

/// Reads a certificate time back as an `OffsetDateTime`.
pub(crate) fn from_x509_time(at: &Time) -> time::OffsetDateTime {
    match at {
        Time::UtcTime(ut) => time::OffsetDateTime::from(ut.to_system_time()),
        Time::GeneralTime(gt) => time::OffsetDateTime::from(gt.to_system_time()),
    }
}
