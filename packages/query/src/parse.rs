//! Reads prefix and proof arguments given inline or as a file path.

use std::fs;

use ibc_lc_commitment::{CommitmentPrefix, MerkleProof};
use serde::de::DeserializeOwned;

use crate::error::ParseError;

/// Parses a commitment prefix given as JSON or as the path of a JSON file
/// # Errors
/// Returns an error if the argument is not valid JSON and cannot be read as a file
pub fn parse_prefix(input: &str) -> Result<CommitmentPrefix, ParseError> {
    parse_json_arg(input)
}

/// Parses a merkle proof given as JSON or as the path of a JSON file
/// # Errors
/// Returns an error if the argument is not valid JSON and cannot be read as a file
pub fn parse_proof(input: &str) -> Result<MerkleProof, ParseError> {
    parse_json_arg(input)
}

/// Parses any value given as JSON or as the path of a JSON file
/// # Errors
/// Returns an error if the argument is not valid JSON and cannot be read as a file
pub fn parse_json_arg<T: DeserializeOwned>(input: &str) -> Result<T, ParseError> {
    if let Ok(value) = serde_json::from_str(input) {
        return Ok(value);
    }
    let contents = fs::read_to_string(input).map_err(|source| ParseError::Io {
        input: input.to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ParseError::Json {
        path: input.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PREFIX_JSON: &str = r#"{"key_prefix":"696263"}"#;

    #[test]
    fn inline_json_is_parsed() {
        assert_eq!(
            parse_prefix(PREFIX_JSON).unwrap(),
            CommitmentPrefix::new(*b"ibc")
        );
    }

    #[test]
    fn file_contents_are_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PREFIX_JSON.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap();
        assert_eq!(parse_prefix(path).unwrap(), CommitmentPrefix::new(*b"ibc"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.json");
        assert!(matches!(
            parse_proof(path.to_str().unwrap()),
            Err(ParseError::Io { .. })
        ));
    }

    #[test]
    fn file_with_invalid_json_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"proofs\": 7}").unwrap();

        let path = file.path().to_str().unwrap();
        assert!(matches!(parse_proof(path), Err(ParseError::Json { .. })));
    }
}
