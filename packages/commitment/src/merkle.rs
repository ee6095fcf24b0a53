//! This module defines [`MerklePath`] and [`MerkleProof`] and the chained
//! (multi-store) verification of ICS-23 proofs against a [`CommitmentRoot`].

use ibc_lc_utils::ensure;
use ics23::{
    calculate_existence_root, commitment_proof::Proof, CommitmentProof, HostFunctionsManager,
    NonExistenceProof,
};
use prost::Message;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{hex::Hex, serde_as};

use crate::{commitment::CommitmentRoot, error::CommitmentError, specs::ProofSpecs};

/// The keys of a value, outermost store first
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// One key per store level
    pub key_path: Vec<Vec<u8>>,
}

impl MerklePath {
    /// Creates a new merkle path
    #[must_use]
    pub const fn new(key_path: Vec<Vec<u8>>) -> Self {
        Self { key_path }
    }

    /// The key of the value at `level`, counting from the innermost store
    fn key_at_level(&self, level: usize) -> &[u8] {
        &self.key_path[self.key_path.len() - 1 - level]
    }
}

/// A chain of ICS-23 proofs, innermost store first
#[derive(Clone, PartialEq, Message)]
pub struct MerkleProof {
    /// One proof per store level
    #[prost(message, repeated, tag = "1")]
    pub proofs: Vec<CommitmentProof>,
}

#[serde_as]
#[derive(Serialize, Deserialize)]
struct MerkleProofJson {
    #[serde_as(as = "Vec<Hex>")]
    proofs: Vec<Vec<u8>>,
}

impl Serialize for MerkleProof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MerkleProofJson {
            proofs: self.proofs.iter().map(Message::encode_to_vec).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MerkleProof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = MerkleProofJson::deserialize(deserializer)?;
        let proofs = json
            .proofs
            .iter()
            .map(|bz| CommitmentProof::decode(bz.as_slice()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)?;
        Ok(Self { proofs })
    }
}

impl MerkleProof {
    /// Decodes a proof from its protobuf encoding
    /// # Errors
    /// Returns an error if the bytes are not a valid encoding
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        Self::decode(bytes).map_err(|e| CommitmentError::DecodeProof(e.to_string()))
    }

    /// Encodes the proof with protobuf
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    fn check_shape(&self, specs: &ProofSpecs, path: &MerklePath) -> Result<(), CommitmentError> {
        ensure!(!self.proofs.is_empty(), CommitmentError::EmptyMerkleProof);
        ensure!(!path.key_path.is_empty(), CommitmentError::EmptyMerklePath);
        ensure!(
            self.proofs.len() == specs.len() && self.proofs.len() == path.key_path.len(),
            CommitmentError::NumberOfProofsMismatch {
                proofs: self.proofs.len(),
                specs: specs.len(),
                keys: path.key_path.len(),
            }
        );
        Ok(())
    }

    /// Verifies that `value` is stored at `path` under `root`
    /// # Errors
    /// Returns an error if any level fails to verify or the final root does not match
    pub fn verify_membership(
        &self,
        specs: &ProofSpecs,
        root: &CommitmentRoot,
        path: &MerklePath,
        value: Vec<u8>,
    ) -> Result<(), CommitmentError> {
        ensure!(!root.is_empty(), CommitmentError::EmptyCommitmentRoot);
        ensure!(!value.is_empty(), CommitmentError::VerifyMembershipFailed(0));
        self.check_shape(specs, path)?;

        let computed = self.verify_chained(specs, path, 0, value)?;
        check_root(root, &computed)
    }

    /// Verifies that nothing is stored at `path` under `root`
    /// # Errors
    /// Returns an error if the absence proof or any outer level fails to verify
    pub fn verify_non_membership(
        &self,
        specs: &ProofSpecs,
        root: &CommitmentRoot,
        path: &MerklePath,
    ) -> Result<(), CommitmentError> {
        ensure!(!root.is_empty(), CommitmentError::EmptyCommitmentRoot);
        self.check_shape(specs, path)?;

        let Some(Proof::Nonexist(non_existence)) = &self.proofs[0].proof else {
            return Err(CommitmentError::InvalidProofType {
                level: 0,
                expected: "non-existence",
            });
        };
        let subroot = non_existence_root(non_existence)?;
        let spec = specs.get(0).ok_or(CommitmentError::EmptyMerkleProof)?;

        ensure!(
            ics23::verify_non_membership::<HostFunctionsManager>(
                &self.proofs[0],
                &spec,
                &subroot,
                path.key_at_level(0),
            ),
            CommitmentError::VerifyNonMembershipFailed
        );

        let computed = if self.proofs.len() > 1 {
            self.verify_chained(specs, path, 1, subroot)?
        } else {
            subroot
        };
        check_root(root, &computed)
    }

    /// Verifies existence proofs from `start` outwards, each level proving the root of the one below
    fn verify_chained(
        &self,
        specs: &ProofSpecs,
        path: &MerklePath,
        start: usize,
        mut value: Vec<u8>,
    ) -> Result<Vec<u8>, CommitmentError> {
        for (level, (proof, spec)) in self.proofs.iter().zip(specs.iter()).enumerate().skip(start)
        {
            let Some(Proof::Exist(existence)) = &proof.proof else {
                return Err(CommitmentError::InvalidProofType {
                    level,
                    expected: "existence",
                });
            };

            let subroot = calculate_existence_root::<HostFunctionsManager>(existence).map_err(
                |e| CommitmentError::FailedToCalculateRoot {
                    level,
                    reason: e.to_string(),
                },
            )?;

            ensure!(
                ics23::verify_membership::<HostFunctionsManager>(
                    proof,
                    &spec,
                    &subroot,
                    path.key_at_level(level),
                    &value,
                ),
                CommitmentError::VerifyMembershipFailed(level)
            );

            value = subroot;
        }

        Ok(value)
    }
}

fn non_existence_root(proof: &NonExistenceProof) -> Result<Vec<u8>, CommitmentError> {
    let neighbour = proof
        .left
        .as_ref()
        .or(proof.right.as_ref())
        .ok_or(CommitmentError::InvalidProofType {
            level: 0,
            expected: "non-existence with a neighbour",
        })?;

    calculate_existence_root::<HostFunctionsManager>(neighbour).map_err(|e| {
        CommitmentError::FailedToCalculateRoot {
            level: 0,
            reason: e.to_string(),
        }
    })
}

fn check_root(root: &CommitmentRoot, computed: &[u8]) -> Result<(), CommitmentError> {
    ensure!(
        root.as_bytes() == computed,
        CommitmentError::RootMismatch {
            expected: root.to_string(),
            computed: CommitmentRoot::from_bytes(computed).to_string(),
        }
    );
    Ok(())
}
