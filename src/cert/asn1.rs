//! Certificate structures as they go over the wire.
//!
//! Same layout as the RFC 5280 types in `x509-cert`, except that extension
//! identifiers are [`Oid`] rather than `ObjectIdentifier`, so custom keys of
//! any length and any second arc survive encoding and parsing.

use der::Sequence;
use der::asn1::{BitString, OctetString};
use x509_cert::Version;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Validity;

use crate::oid::Oid;

/// ```text
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct Extension {
    pub extn_id: Oid,
    #[asn1(default = "Default::default")]
    pub critical: bool,
    pub extn_value: OctetString,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct TbsCertificate {
    #[asn1(context_specific = "0", default = "Default::default")]
    pub version: Version,
    pub serial_number: SerialNumber,
    pub signature: AlgorithmIdentifierOwned,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub issuer_unique_id: Option<BitString>,
    #[asn1(context_specific = "2", tag_mode = "IMPLICIT", optional = "true")]
    pub subject_unique_id: Option<BitString>,
    #[asn1(context_specific = "3", tag_mode = "EXPLICIT", optional = "true")]
    pub extensions: Option<Vec<Extension>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct Certificate {
    pub tbs_certificate: TbsCertificate,
    pub signature_algorithm: AlgorithmIdentifierOwned,
    pub signature: BitString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::{Decode, Encode};

    #[test]
    fn test_extension_with_short_custom_id() {
        let ext = Extension {
            extn_id: Oid::from_key("p").unwrap(),
            critical: true,
            extn_value: OctetString::new(b"value".to_vec()).unwrap(),
        };
        let der = ext.to_der().unwrap();
        assert_eq!(Extension::from_der(&der).unwrap(), ext);
    }

    #[test]
    fn test_non_critical_flag_is_omitted() {
        let ext = Extension {
            extn_id: Oid::from_key("trust-level").unwrap(),
            critical: false,
            extn_value: OctetString::new(Vec::new()).unwrap(),
        };
        let der = ext.to_der().unwrap();
        // SEQUENCE { OID (13 bytes), OCTET STRING (2 bytes) }
        assert_eq!(der.len(), 2 + 13 + 2);
        assert!(!Extension::from_der(&der).unwrap().critical);
    }
}
