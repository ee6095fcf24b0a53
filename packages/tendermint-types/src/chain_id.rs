//! This module defines [`ChainId`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tendermint::chain;

use crate::error::ValidationError;

/// Identifier of a chain, optionally carrying a revision number as `{name}-{N}`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a chain id
    /// # Errors
    /// Returns an error if `id` is empty
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyChainId);
        }
        Ok(Self(id))
    }

    /// The chain id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The revision number encoded in the chain id, or zero if it has none.
    ///
    /// `osmosis-1` has revision 1, while `testchain` and `chain-01` have
    /// revision 0.
    #[must_use]
    pub fn revision_number(&self) -> u64 {
        let Some((name, revision)) = self.0.rsplit_once('-') else {
            return 0;
        };
        if name.is_empty() || revision.starts_with('0') {
            return 0;
        }
        if !revision.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        revision.parse().unwrap_or(0)
    }
}

impl From<&chain::Id> for ChainId {
    fn from(id: &chain::Id) -> Self {
        Self(id.as_str().to_string())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
