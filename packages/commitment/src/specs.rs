//! This module defines [`ProofSpecs`], the proof system a client expects.

use ics23::ProofSpec;
use serde::{Deserialize, Serialize};

/// The kind of tree a single level of the proof chain is built over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofSpecKind {
    /// IAVL+ trees, as used by Cosmos SDK sub-stores
    Iavl,
    /// Simple Merkle trees, as used by Tendermint for the multistore
    Tendermint,
}

impl ProofSpecKind {
    /// The ics23 proof spec for this kind of tree
    #[must_use]
    pub fn spec(self) -> ProofSpec {
        match self {
            Self::Iavl => ics23::iavl_spec(),
            Self::Tendermint => ics23::tendermint_spec(),
        }
    }
}

/// Ordered proof specs, one per level, from the innermost store outwards
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSpecs(Vec<ProofSpecKind>);

impl ProofSpecs {
    /// Creates proof specs from the given levels
    #[must_use]
    pub const fn new(levels: Vec<ProofSpecKind>) -> Self {
        Self(levels)
    }

    /// The specs of a Cosmos SDK chain: an IAVL sub-store inside a simple Merkle multistore
    #[must_use]
    pub fn cosmos() -> Self {
        Self(vec![ProofSpecKind::Iavl, ProofSpecKind::Tendermint])
    }

    /// Two simple Merkle levels, matching what [`crate::store::MemoryStore`] produces
    #[must_use]
    pub fn simple() -> Self {
        Self(vec![ProofSpecKind::Tendermint, ProofSpecKind::Tendermint])
    }

    /// Number of levels
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no levels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the ics23 specs of every level
    pub fn iter(&self) -> impl Iterator<Item = ProofSpec> + '_ {
        self.0.iter().map(|kind| kind.spec())
    }

    /// The ics23 spec at the given level
    #[must_use]
    pub fn get(&self, level: usize) -> Option<ProofSpec> {
        self.0.get(level).map(|kind| kind.spec())
    }
}

impl Default for ProofSpecs {
    fn default() -> Self {
        Self::simple()
    }
}
