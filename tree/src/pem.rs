// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! PEM certificate input.

use crate::errors::TreeError;
use csca_leaf::Certificate;
use x509_cert::der::DecodePem;

const BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const END: &str = "-----END CERTIFICATE-----";

/// Parse one PEM encoded certificate per string.
///
/// The error names the index of the first block that failed.
pub fn parse_pem_certificates<S: AsRef<str>>(blocks: &[S]) -> Result<Vec<Certificate>, TreeError> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| parse_block(index, block.as_ref()))
        .collect()
}

/// Parse every `CERTIFICATE` block of a PEM bundle, ignoring text between
/// blocks.
pub fn parse_pem_bundle(bundle: &[u8]) -> Result<Vec<Certificate>, TreeError> {
    let text = std::str::from_utf8(bundle).map_err(|e| TreeError::Certificate {
        index: 0,
        reason: format!("bundle is not valid UTF-8: {}", e),
    })?;

    let mut certificates = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(BEGIN) {
        let index = certificates.len();
        let end = rest[start..]
            .find(END)
            .map(|end| start + end + END.len())
            .ok_or_else(|| TreeError::Certificate {
                index,
                reason: "missing end marker".to_string(),
            })?;
        certificates.push(parse_block(index, &rest[start..end])?);
        rest = &rest[end..];
    }
    Ok(certificates)
}

fn parse_block(index: usize, block: &str) -> Result<Certificate, TreeError> {
    Certificate::from_pem(block.trim()).map_err(|e| TreeError::Certificate {
        index,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert!(parse_pem_bundle(b"").unwrap().is_empty());
        assert!(parse_pem_bundle(b"no certificates here").unwrap().is_empty());
        assert!(parse_pem_certificates::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_broken_blocks() {
        let truncated = format!("{}\nMIIB\n", BEGIN);
        assert_eq!(
            parse_pem_bundle(truncated.as_bytes()).unwrap_err(),
            TreeError::Certificate {
                index: 0,
                reason: "missing end marker".to_string()
            }
        );

        let garbage = format!("{}\nAAAA\n{}\n", BEGIN, END);
        assert!(matches!(
            parse_pem_certificates(&[garbage]),
            Err(TreeError::Certificate { index: 0, .. })
        ));
        assert!(matches!(
            parse_pem_bundle(&[0xff, 0xfe]),
            Err(TreeError::Certificate { .. })
        ));
    }
}
