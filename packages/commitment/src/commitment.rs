//! This module defines [`CommitmentRoot`] and [`CommitmentPrefix`].

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::merkle::MerklePath;

/// The digest of a remote chain's state at some height
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentRoot(#[serde_as(as = "Hex")] Vec<u8>);

impl CommitmentRoot {
    /// Wraps the given bytes as a commitment root
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// The root as raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the root holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the root and returns its bytes
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for CommitmentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

/// The store prefix under which a chain commits its IBC state
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentPrefix {
    /// The raw prefix, usually the name of the store (`ibc`)
    #[serde_as(as = "Hex")]
    pub key_prefix: Vec<u8>,
}

impl CommitmentPrefix {
    /// Creates a prefix from raw bytes
    #[must_use]
    pub fn new(key_prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
        }
    }

    /// Whether the prefix is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_prefix.is_empty()
    }

    /// Builds the full merkle path of `path` under this prefix
    #[must_use]
    pub fn apply(&self, path: impl Into<Vec<u8>>) -> MerklePath {
        MerklePath::new(vec![self.key_prefix.clone(), path.into()])
    }
}
