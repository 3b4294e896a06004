//! # CertMint - A Small Internal Certificate Authority
//!
//! CertMint issues X.509 certificates for internal use: self-signed roots and
//! leaves signed by a root, each carrying a fixed usage policy plus any number
//! of caller-defined key/value extensions. It is built on the rustcrypto
//! crates and writes its output as PEM files.
//!
//! ## Custom Extensions
//!
//! A custom extension is named by an arbitrary string. The key's UTF-8 bytes
//! are read as a BER-encoded object identifier (see [`oid`]), and that OID
//! tags a critical extension whose value is the raw bytes of the caller's
//! value. Reading an extension back by key decodes the key the same way and
//! compares arc by arc.
//!
//! ## Quick Start
//!
//! ### Issuing a Root and a Leaf
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//!
//! use certmint::cert::CertificateWithPrivateKey;
//! use certmint::cert::params::{CertInformation, DistinguishedName};
//! use certmint::issuance::IssuanceEngine;
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let mut engine = IssuanceEngine::default();
//!
//! let root_info = CertInformation::builder()
//!     .subject(
//!         DistinguishedName::builder()
//!             .country(vec!["SE".to_string()])
//!             .organization(vec!["Company Co.".to_string()])
//!             .common_name("Root CA".to_string())
//!             .build(),
//!     )
//!     .is_ca(true)
//!     .cert_path("ca.crt")
//!     .key_path("ca.key")
//!     .build();
//! engine.issue(None, None, &root_info)?;
//!
//! let root = CertificateWithPrivateKey::load("ca.crt", "ca.key")?;
//! let leaf_info = CertInformation::builder()
//!     .subject(
//!         DistinguishedName::builder()
//!             .common_name("worker-01".to_string())
//!             .build(),
//!     )
//!     .email_addresses(vec!["ops@example.com".to_string()])
//!     .cert_path("worker.crt")
//!     .key_path("worker.key")
//!     .extensions(BTreeMap::from([("trust-level".to_string(), "high".to_string())]))
//!     .build();
//! let leaf = engine.issue_from(&root, &leaf_info)?;
//!
//! let value = leaf.certificate.cert.extension_value("trust-level");
//! assert_eq!(value, Some(&b"high"[..]));
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting a Certificate
//!
//! ```rust,no_run
//! use certmint::store;
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let cert = store::read_certificate("worker.crt")?;
//! println!("{}", cert.to_text());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use certmint::{error::CertMintError, key::KeyPair};
//!
//! match KeyPair::import_from_der(b"not a key") {
//!     Ok(_) => println!("Key imported successfully"),
//!     Err(CertMintError::RsaPkcs1Error(msg)) => println!("Failed to decode key: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`oid`]: Base-128 OID arcs and the key to OID mapping
//! - [`serial`]: Serial number generation
//! - [`key`]: RSA key generation, import/export, and signing
//! - [`cert`]: Certificate encoding/decoding, names, and extensions
//! - [`template`]: The per-issuance certificate template
//! - [`issuer`]: Signing a template into a certificate
//! - [`issuance`]: The issuance engine tying keys, templates, and files together
//! - [`store`]: PEM files on disk
//! - [`inspect`]: Human-readable certificate dumps
//! - [`error`]: Error types

pub mod cert;
pub mod error;
pub mod inspect;
pub mod issuance;
pub mod issuer;
pub mod key;
pub mod oid;
pub mod pem_utils;
pub mod serial;
pub mod store;
pub mod template;
