use crate::error::CertMintError;

/// PEM label of an encoded certificate.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
/// PEM label of an encoded private key.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new())
}

/// Convert the first PEM block of `pem_str` to DER, requiring one of `labels`.
pub fn pem_to_der(pem_str: &str, labels: &[&str]) -> Result<Vec<u8>, CertMintError> {
    let pem = pem::parse(pem_str)?;
    if !labels.contains(&pem.tag()) {
        return Err(CertMintError::DecodingError(format!(
            "unexpected PEM label {:?}, wanted one of {labels:?}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pem_framing() {
        let pem = der_to_pem(&[1, 2, 3], CERTIFICATE_LABEL);
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(pem_to_der(&pem, &[CERTIFICATE_LABEL]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_wrong_label() {
        let pem = der_to_pem(&[1, 2, 3], PRIVATE_KEY_LABEL);
        assert!(matches!(
            pem_to_der(&pem, &[CERTIFICATE_LABEL]),
            Err(CertMintError::DecodingError(_))
        ));
    }

    #[test]
    fn test_not_pem() {
        assert!(pem_to_der("garbage", &[CERTIFICATE_LABEL]).is_err());
    }
}
