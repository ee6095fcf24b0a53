//! Verifies that a key-value pair is (or is not) committed in the state root
//! of a tendermint consensus state.
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

use ibc_lc_commitment::{CommitmentError, CommitmentPrefix, CommitmentRoot, MerkleProof};
use ibc_lc_tendermint_types::{ClientState, ConsensusState, Height};

/// Key-value pair for membership/non-membership proofs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KVPair {
    /// Storage path as raw bytes, without the commitment prefix
    pub path: Vec<u8>,
    /// Value (empty for non-membership proofs)
    pub value: Vec<u8>,
}

impl KVPair {
    /// Create a new key-value pair
    #[must_use]
    pub const fn new(path: Vec<u8>, value: Vec<u8>) -> Self {
        Self { path, value }
    }

    /// Check if this is a non-membership proof (empty value)
    #[must_use]
    pub const fn is_non_membership(&self) -> bool {
        self.value.is_empty()
    }
}

/// Output for membership verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipOutput {
    /// The commitment root that was verified against
    pub commitment_root: CommitmentRoot,
    /// The verified key-value pairs
    pub kv_pairs: Vec<KVPair>,
}

/// Error type for membership verification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MembershipError {
    /// The client was frozen after misbehaviour
    #[error("client is frozen at height {0}")]
    ClientFrozen(Height),
    /// The client has no prefix to apply to paths
    #[error("commitment prefix cannot be empty")]
    EmptyPrefix,
    /// Non-membership verification failed
    #[error("non-membership verification failed: {0}")]
    NonMembershipVerificationFailed(#[source] CommitmentError),
    /// Membership verification failed
    #[error("membership verification failed: {0}")]
    MembershipVerificationFailed(#[source] CommitmentError),
}

/// Verifies a batch of key-value pairs against the root of `consensus_state`.
///
/// Pairs with an empty value are verified for non-membership.
///
/// # Errors
///
/// Returns `MembershipError::ClientFrozen` if the client is frozen.
/// Returns `MembershipError::NonMembershipVerificationFailed` if non-membership proof verification fails.
/// Returns `MembershipError::MembershipVerificationFailed` if membership proof verification fails.
pub fn membership(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    prefix: &CommitmentPrefix,
    request_iter: impl Iterator<Item = (KVPair, MerkleProof)>,
) -> Result<MembershipOutput, MembershipError> {
    let kv_pairs = request_iter
        .map(|(kv_pair, merkle_proof)| {
            if kv_pair.is_non_membership() {
                verify_non_membership(
                    client_state,
                    consensus_state,
                    prefix,
                    &kv_pair.path,
                    &merkle_proof,
                )?;
            } else {
                verify_membership(
                    client_state,
                    consensus_state,
                    prefix,
                    &kv_pair.path,
                    kv_pair.value.clone(),
                    &merkle_proof,
                )?;
            }

            Ok(kv_pair)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MembershipOutput {
        commitment_root: consensus_state.root.clone(),
        kv_pairs,
    })
}

/// Verifies that `value` is stored at `path` under the consensus state's root
/// # Errors
/// Returns an error if the client is frozen or the proof does not verify
pub fn verify_membership(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    prefix: &CommitmentPrefix,
    path: &[u8],
    value: Vec<u8>,
    proof: &MerkleProof,
) -> Result<(), MembershipError> {
    check_client(client_state, prefix)?;
    proof
        .verify_membership(
            &client_state.proof_specs,
            &consensus_state.root,
            &prefix.apply(path.to_vec()),
            value,
        )
        .map_err(MembershipError::MembershipVerificationFailed)
}

/// Verifies that nothing is stored at `path` under the consensus state's root
/// # Errors
/// Returns an error if the client is frozen or the proof does not verify
pub fn verify_non_membership(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    prefix: &CommitmentPrefix,
    path: &[u8],
    proof: &MerkleProof,
) -> Result<(), MembershipError> {
    check_client(client_state, prefix)?;
    proof
        .verify_non_membership(
            &client_state.proof_specs,
            &consensus_state.root,
            &prefix.apply(path.to_vec()),
        )
        .map_err(MembershipError::NonMembershipVerificationFailed)
}

fn check_client(client_state: &ClientState, prefix: &CommitmentPrefix) -> Result<(), MembershipError> {
    if let Some(height) = client_state.frozen_height {
        return Err(MembershipError::ClientFrozen(height));
    }
    if prefix.is_empty() {
        return Err(MembershipError::EmptyPrefix);
    }
    Ok(())
}
