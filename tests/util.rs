use std::collections::BTreeMap;
use std::path::Path;

use certmint::cert::params::{CertInformation, DistinguishedName};
use certmint::issuance::{IssuanceEngine, Issued};

pub fn engine() -> IssuanceEngine {
    IssuanceEngine::builder().rsa_bits(1024).build()
}

pub fn cert_info(
    dir: &Path,
    name: &str,
    is_ca: bool,
    extensions: &[(&str, &str)],
) -> CertInformation {
    CertInformation::builder()
        .subject(
            DistinguishedName::builder()
                .country(vec!["SE".to_string()])
                .organization(vec!["Company Co.".to_string()])
                .common_name(name.to_string())
                .build(),
        )
        .is_ca(is_ca)
        .cert_path(dir.join(format!("{name}.crt")))
        .key_path(dir.join(format!("{name}.key")))
        .extensions(
            extensions
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
        .build()
}

pub fn generate_ca_cert(engine: &mut IssuanceEngine, dir: &Path) -> Issued {
    let info = cert_info(dir, "myca.local", true, &[]);
    engine.issue(None, None, &info).unwrap()
}
