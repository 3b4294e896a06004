use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::asn1::{Any, SetOfVec};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::CertMintError;
use crate::oid::Oid;

const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const PROVINCE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATIONAL_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Years between `notBefore` and `notAfter` of every issued certificate.
pub const VALIDITY_YEARS: i32 = 20;

/// Everything the caller says about a certificate before it is issued.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `email_addresses` - Addresses placed in the Subject Alternative Name.
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `cert_path` - Where the PEM certificate is written.
/// * `key_path` - Where the PEM private key is written.
/// * `extensions` - Custom extension values keyed by an arbitrary string.
///   Each key is mapped to an OID by [`crate::oid::Oid::from_key`].
#[derive(Clone, Debug, Builder)]
pub struct CertInformation {
    pub subject: DistinguishedName,
    #[builder(default)]
    pub email_addresses: Vec<String>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(into)]
    pub cert_path: PathBuf,
    #[builder(into)]
    pub key_path: PathBuf,
    #[builder(default)]
    pub extensions: BTreeMap<String, String>,
}

/// Distinguished name of a certificate subject or issuer.
///
/// Every attribute but the common name may repeat; each value becomes its own
/// RDN, in the order C, ST, L, O, OU, CN.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(default)]
    pub country: Vec<String>,
    #[builder(default)]
    pub province: Vec<String>,
    #[builder(default)]
    pub locality: Vec<String>,
    #[builder(default)]
    pub organization: Vec<String>,
    #[builder(default)]
    pub organizational_unit: Vec<String>,
    #[builder(default)]
    pub common_name: String,
}

impl DistinguishedName {
    fn attributes(&self) -> impl Iterator<Item = (ObjectIdentifier, &str)> {
        tagged(COUNTRY, &self.country)
            .chain(tagged(PROVINCE, &self.province))
            .chain(tagged(LOCALITY, &self.locality))
            .chain(tagged(ORGANIZATION, &self.organization))
            .chain(tagged(ORGANIZATIONAL_UNIT, &self.organizational_unit))
            .chain(
                (!self.common_name.is_empty())
                    .then_some((COMMON_NAME, self.common_name.as_str())),
            )
    }

    /// Converts the distinguished name to an X.509-compatible format.
    pub fn as_x509_name(&self) -> Result<Name, CertMintError> {
        let rdns = self
            .attributes()
            .map(|(oid, value)| -> der::Result<RelativeDistinguishedName> {
                let tag = if oid == COUNTRY {
                    Tag::PrintableString
                } else {
                    Tag::Utf8String
                };
                let atv = AttributeTypeAndValue {
                    oid,
                    value: Any::new(tag, value.as_bytes())?,
                };
                Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
            })
            .collect::<der::Result<Vec<_>>>()?;
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// Attributes other than C, ST, L, O, OU and CN are ignored.
    pub fn from_x509_name(name: &Name) -> Self {
        let mut dn = DistinguishedName::default();
        for rdn in name.0.iter() {
            for attr in rdn.0.iter() {
                let value = String::from_utf8_lossy(attr.value.value()).into_owned();
                match attr.oid {
                    COUNTRY => dn.country.push(value),
                    PROVINCE => dn.province.push(value),
                    LOCALITY => dn.locality.push(value),
                    ORGANIZATION => dn.organization.push(value),
                    ORGANIZATIONAL_UNIT => dn.organizational_unit.push(value),
                    COMMON_NAME => dn.common_name = value,
                    _ => {}
                }
            }
        }
        dn
    }
}

fn tagged(
    oid: ObjectIdentifier,
    values: &[String],
) -> impl Iterator<Item = (ObjectIdentifier, &str)> {
    values.iter().map(move |v| (oid, v.as_str()))
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (oid, value)) in self.attributes().enumerate() {
            let short = match oid {
                COUNTRY => "C",
                PROVINCE => "ST",
                LOCALITY => "L",
                ORGANIZATION => "O",
                ORGANIZATIONAL_UNIT => "OU",
                _ => "CN",
            };
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{short}={value}")?;
        }
        Ok(())
    }
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
#[derive(Clone, Debug)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now and lasting `years` calendar years.
    pub fn for_years(years: i32) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            not_before: now,
            not_after: add_years(now, years),
        }
    }
}

fn add_years(at: OffsetDateTime, years: i32) -> OffsetDateTime {
    let year = at.year() + years;
    match at.replace_year(year) {
        Ok(shifted) => shifted,
        // Feb 29 into a common year rolls over to Mar 1.
        Err(_) => at
            .replace_day(28)
            .and_then(|d| d.replace_year(year))
            .map(|d| d + Duration::days(1))
            .unwrap_or(at + Duration::days(365 * i64::from(years))),
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The extension value, DER for standard extensions and raw
///   caller bytes for custom ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: Oid,
    pub critical: bool,
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: E,
        critical: bool,
    ) -> Result<Self, CertMintError> {
        Ok(Self {
            oid: E::OID.into(),
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E, CertMintError> {
        E::from_x509_extension_value(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::{Decode, Encode};

    fn work_stacks() -> DistinguishedName {
        DistinguishedName::builder()
            .country(vec!["CN".to_string()])
            .province(vec!["JiangSu".to_string()])
            .locality(vec!["SuZhou".to_string()])
            .organization(vec!["WS".to_string()])
            .organizational_unit(vec!["work-stacks".to_string(), "ops".to_string()])
            .common_name("Work-Stacks".to_string())
            .build()
    }

    #[test]
    fn test_name_round_trip() {
        let dn = work_stacks();
        let der = dn.as_x509_name().unwrap().to_der().unwrap();
        let decoded = DistinguishedName::from_x509_name(&Name::from_der(&der).unwrap());
        assert_eq!(dn, decoded);
    }

    #[test]
    fn test_name_display() {
        assert_eq!(
            work_stacks().to_string(),
            "C=CN, ST=JiangSu, L=SuZhou, O=WS, OU=work-stacks, OU=ops, CN=Work-Stacks"
        );
    }

    #[test]
    fn test_empty_common_name_is_omitted() {
        let dn = DistinguishedName::builder()
            .organization(vec!["WS".to_string()])
            .build();
        assert_eq!(dn.as_x509_name().unwrap().0.len(), 1);
    }

    #[test]
    fn test_validity_spans_twenty_years() {
        let validity = Validity::for_years(VALIDITY_YEARS);
        assert_eq!(
            validity.not_after.year() - validity.not_before.year(),
            VALIDITY_YEARS
        );
        assert_eq!(validity.not_after.month(), validity.not_before.month());
    }

    #[test]
    fn test_leap_day_rolls_forward() {
        let leap = time::macros::datetime!(2024-02-29 12:00 UTC);
        let shifted = add_years(leap, 1);
        assert_eq!(shifted.date(), time::macros::date!(2025-03-01));
        assert_eq!(add_years(leap, 4).date(), time::macros::date!(2028-02-29));
    }
}
