//! Human-readable certificate dumps in the style of `openssl x509 -text`.

use std::fmt;

use rsa::traits::PublicKeyParts;
use time::OffsetDateTime;
use time::macros::format_description;
use x509_cert::Version;

use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier, ToAndFromX509Extension,
};
use crate::cert::params::ExtensionParam;

/// Bytes per line for serials and key identifiers.
const SHORT_LINE: usize = 256;
/// Bytes per line for the RSA modulus.
const MODULUS_LINE: usize = 16;
/// Bytes per line for the signature.
const SIGNATURE_LINE: usize = 18;

/// Splits `bytes` into `width`-sized groups, the last one possibly shorter,
/// each rendered as colon-separated uppercase hex pairs.
pub fn pretty_print_bytes(bytes: &[u8], width: usize) -> Vec<String> {
    bytes
        .chunks(width.max(1))
        .map(|group| {
            group
                .iter()
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(":")
        })
        .collect()
}

fn format_time(at: OffsetDateTime) -> String {
    let layout = format_description!(
        "[month repr:short] [day padding:space] [hour]:[minute]:[second] [year] GMT"
    );
    at.format(layout).unwrap_or_else(|_| at.to_string())
}

/// Display adapter produced by [`Certificate::to_text`].
pub struct CertificateText<'a>(&'a Certificate);

impl Certificate {
    pub fn to_text(&self) -> String {
        CertificateText(self).to_string()
    }
}

impl fmt::Display for CertificateText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cert = self.0;
        let tbs = &cert.inner.tbs_certificate;
        let validity = cert.validity();

        writeln!(f, "Certificate:")?;
        writeln!(f, "    Data:")?;
        let version = match tbs.version {
            Version::V1 => 0,
            Version::V2 => 1,
            Version::V3 => 2,
        };
        writeln!(f, "        Version: {} (0x{:x})", version + 1, version)?;
        writeln!(f, "        Serial Number:")?;
        for line in pretty_print_bytes(cert.serial_number(), SHORT_LINE) {
            writeln!(f, "            {line}")?;
        }
        writeln!(
            f,
            "    Signature Algorithm: {}",
            algorithm_name(&tbs.signature.oid)
        )?;
        writeln!(f, "        Issuer: {}", cert.issuer())?;
        writeln!(f, "        Validity")?;
        writeln!(f, "            Not Before: {}", format_time(validity.not_before))?;
        writeln!(f, "            Not After : {}", format_time(validity.not_after))?;
        writeln!(f, "        Subject: {}", cert.subject())?;
        writeln!(f, "        Subject Public Key Info:")?;
        match cert.public_key() {
            Ok(public_key) => {
                let rsa = &public_key.0;
                writeln!(f, "            Public Key Algorithm: rsaEncryption")?;
                writeln!(f, "                Public-Key: ({} bit)", rsa.size() * 8)?;
                writeln!(f, "                Modulus:")?;
                for line in pretty_print_bytes(&rsa.n().to_bytes_be(), MODULUS_LINE) {
                    writeln!(f, "                    {line}")?;
                }
                writeln!(f, "                Exponent: {}", rsa.e())?;
            }
            Err(_) => {
                writeln!(
                    f,
                    "            Public Key Algorithm: {}",
                    tbs.subject_public_key_info.algorithm.oid
                )?;
                writeln!(f, "                Key Information Not Implemented")?;
            }
        }

        let extensions = cert.extensions();
        if !extensions.is_empty() {
            writeln!(f, "        X509v3 extensions:")?;
            for ext in &extensions {
                write_extension(f, ext)?;
            }
        }

        writeln!(
            f,
            "    Signature Algorithm: {}",
            algorithm_name(&cert.inner.signature_algorithm.oid)
        )?;
        for line in pretty_print_bytes(cert.signature(), SIGNATURE_LINE) {
            writeln!(f, "         {line}")?;
        }
        Ok(())
    }
}

fn algorithm_name(oid: &const_oid::ObjectIdentifier) -> String {
    if *oid == const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION {
        SignatureAlgorithm::Sha256WithRSA.name().to_string()
    } else {
        oid.to_string()
    }
}

fn write_extension(f: &mut fmt::Formatter<'_>, ext: &ExtensionParam) -> fmt::Result {
    let critical = if ext.critical { " critical" } else { "" };
    match ext.oid.as_object_identifier() {
        Some(BasicConstraints::OID) => {
            writeln!(f, "            X509v3 Basic Constraints:{critical}")?;
            match ext.to_extension::<BasicConstraints>() {
                Ok(bc) => {
                    let ca = if bc.is_ca { "TRUE" } else { "FALSE" };
                    match bc.max_path_length {
                        Some(len) => writeln!(f, "                CA:{ca}, pathlen:{len}"),
                        None => writeln!(f, "                CA:{ca}"),
                    }
                }
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        Some(KeyUsage::OID) => {
            writeln!(f, "            X509v3 Key Usage:{critical}")?;
            match ext.to_extension::<KeyUsage>() {
                Ok(ku) => writeln!(f, "                {}", ku.names().join(", ")),
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        Some(ExtendedKeyUsage::OID) => {
            writeln!(f, "            X509v3 Extended Key Usage:{critical}")?;
            match ext.to_extension::<ExtendedKeyUsage>() {
                Ok(eku) => {
                    let names: Vec<_> = eku.usage.iter().map(|u| u.to_string()).collect();
                    writeln!(f, "                {}", names.join(", "))
                }
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        Some(SubjectKeyIdentifier::OID) => {
            writeln!(f, "            X509v3 Subject Key Identifier:{critical}")?;
            match ext.to_extension::<SubjectKeyIdentifier>() {
                Ok(ski) => write_hex_lines(f, &ski.0),
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        Some(AuthorityKeyIdentifier::OID) => {
            writeln!(f, "            X509v3 Authority Key Identifier:{critical}")?;
            match ext.to_extension::<AuthorityKeyIdentifier>() {
                Ok(aki) => write_hex_lines(f, &aki.key_identifier),
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        Some(SubjectAltName::OID) => {
            writeln!(f, "            X509v3 Subject Alternative Name:{critical}")?;
            match ext.to_extension::<SubjectAltName>() {
                Ok(san) => {
                    let emails: Vec<_> = san
                        .email_addresses
                        .iter()
                        .map(|e| format!("email:{e}"))
                        .collect();
                    writeln!(f, "                {}", emails.join(", "))
                }
                Err(_) => writeln!(f, "                <malformed>"),
            }
        }
        _ => {
            writeln!(f, "            {}:{critical}", ext.oid)?;
            writeln!(f, "                {}", String::from_utf8_lossy(&ext.value))
        }
    }
}

fn write_hex_lines(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for line in pretty_print_bytes(bytes, SHORT_LINE) {
        writeln!(f, "                {line}")?;
    }
    Ok(())
}
