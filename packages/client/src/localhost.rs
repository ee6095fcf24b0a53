//! The localhost client, with which the host tracks its own state.
//!
//! The host supplies its own headers, so nothing is signed: an update only
//! has to advance the height.

use ibc_lc_commitment::{
    CommitmentError, CommitmentPrefix, CommitmentRoot, MerkleProof, ProofSpecs,
};
use ibc_lc_tendermint_types::{tendermint::Time, ChainId, Height};
use ibc_lc_utils::ensure;
use serde::{Deserialize, Serialize};

/// The client type of the localhost client
pub const LOCALHOST_CLIENT_TYPE: &str = "09-localhost";

/// Errors raised by the localhost client
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum LocalhostError {
    /// The header does not advance the client
    #[error("localhost header height {header} must be greater than latest height {latest}")]
    HeightNotAdvancing {
        /// Height of the header
        header: Height,
        /// Latest height of the client
        latest: Height,
    },

    /// The header is in another revision of the host chain
    #[error("localhost header revision {header} does not match chain revision {chain}")]
    RevisionMismatch {
        /// Revision of the header
        header: u64,
        /// Revision of the host chain id
        chain: u64,
    },
}

/// Client state of the localhost client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct LocalhostClientState {
    /// Chain id of the host
    pub chain_id: ChainId,
    /// Latest height of the host seen by the client
    pub latest_height: Height,
}

/// Consensus state of the localhost client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct LocalhostConsensusState {
    /// Height of the host block
    pub height: Height,
    /// Time of the host block
    pub timestamp: Time,
    /// State root of the host block
    pub root: CommitmentRoot,
}

/// A host block as seen by its own localhost client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct LocalhostHeader {
    /// Height of the host block
    pub height: Height,
    /// Time of the host block
    pub timestamp: Time,
    /// State root of the host block
    pub root: CommitmentRoot,
}

impl From<&LocalhostHeader> for LocalhostConsensusState {
    fn from(header: &LocalhostHeader) -> Self {
        Self {
            height: header.height,
            timestamp: header.timestamp,
            root: header.root.clone(),
        }
    }
}

impl LocalhostClientState {
    /// Accepts a host block and returns the updated client and consensus states
    /// # Errors
    /// Returns an error if the header is in another revision or does not advance the client
    pub fn check_header_and_update(
        &self,
        header: &LocalhostHeader,
    ) -> Result<(Self, LocalhostConsensusState), LocalhostError> {
        let chain = self.chain_id.revision_number();
        ensure!(
            header.height.revision_number == chain,
            LocalhostError::RevisionMismatch {
                header: header.height.revision_number,
                chain,
            }
        );
        ensure!(
            header.height > self.latest_height,
            LocalhostError::HeightNotAdvancing {
                header: header.height,
                latest: self.latest_height,
            }
        );

        let client_state = Self {
            chain_id: self.chain_id.clone(),
            latest_height: header.height,
        };
        Ok((client_state, LocalhostConsensusState::from(header)))
    }

    /// Verifies that `value` is stored at `path` in the host state at `consensus_state`
    /// # Errors
    /// Returns an error if the proof does not verify
    pub fn verify_membership(
        consensus_state: &LocalhostConsensusState,
        prefix: &CommitmentPrefix,
        path: &[u8],
        value: Vec<u8>,
        proof: &MerkleProof,
    ) -> Result<(), CommitmentError> {
        proof.verify_membership(
            &ProofSpecs::default(),
            &consensus_state.root,
            &prefix.apply(path.to_vec()),
            value,
        )
    }

    /// Verifies that nothing is stored at `path` in the host state at `consensus_state`
    /// # Errors
    /// Returns an error if the proof does not verify
    pub fn verify_non_membership(
        consensus_state: &LocalhostConsensusState,
        prefix: &CommitmentPrefix,
        path: &[u8],
        proof: &MerkleProof,
    ) -> Result<(), CommitmentError> {
        proof.verify_non_membership(
            &ProofSpecs::default(),
            &consensus_state.root,
            &prefix.apply(path.to_vec()),
        )
    }
}

#[cfg(test)]
mod tests {
    use ibc_lc_commitment::{KvStore, MemoryStore};
    use ibc_lc_tendermint_types::test_utils;
    use rstest::rstest;

    use super::*;

    fn client(latest: u64) -> LocalhostClientState {
        LocalhostClientState {
            chain_id: ChainId::new("host-2").unwrap(),
            latest_height: Height::new(2, latest).unwrap(),
        }
    }

    fn header(revision: u64, height: u64) -> LocalhostHeader {
        LocalhostHeader {
            height: Height::new(revision, height).unwrap(),
            timestamp: test_utils::time(height),
            root: vec![1; 32].into(),
        }
    }

    #[rstest]
    #[case::same_height(header(2, 5))]
    #[case::lower(header(2, 4))]
    fn header_must_advance(#[case] header: LocalhostHeader) {
        let err = client(5).check_header_and_update(&header).unwrap_err();
        assert!(matches!(err, LocalhostError::HeightNotAdvancing { .. }));
    }

    #[test]
    fn header_in_other_revision_is_rejected() {
        let err = client(5).check_header_and_update(&header(3, 9)).unwrap_err();
        assert_eq!(err, LocalhostError::RevisionMismatch { header: 3, chain: 2 });
    }

    #[test]
    fn update_moves_latest_height() {
        let (client_state, consensus_state) =
            client(5).check_header_and_update(&header(2, 6)).unwrap();
        assert_eq!(client_state.latest_height, Height::new(2, 6).unwrap());
        assert_eq!(consensus_state.root, header(2, 6).root);
    }

    #[test]
    fn proofs_verify_against_host_root() {
        let mut store = MemoryStore::new(*b"ibc");
        store.set(b"connections/connection-0".to_vec(), b"open".to_vec());
        let (height, root) = store.commit();
        let (_, proof) = store
            .query_with_proof(height, b"connections/connection-0")
            .unwrap();
        let consensus_state = LocalhostConsensusState {
            height: Height::new(2, height).unwrap(),
            timestamp: test_utils::time(1),
            root,
        };

        LocalhostClientState::verify_membership(
            &consensus_state,
            &store.prefix(),
            b"connections/connection-0",
            b"open".to_vec(),
            &proof,
        )
        .unwrap();
        assert!(LocalhostClientState::verify_non_membership(
            &consensus_state,
            &store.prefix(),
            b"connections/connection-0",
            &proof,
        )
        .is_err());
    }
}
