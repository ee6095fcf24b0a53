//! This module defines [`CommitmentError`].

/// Errors raised while building or verifying commitment proofs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum CommitmentError {
    /// The proof contains no commitment proofs
    #[error("merkle proof is empty")]
    EmptyMerkleProof,

    /// The commitment root is empty
    #[error("commitment root is empty")]
    EmptyCommitmentRoot,

    /// The merkle path has no keys
    #[error("merkle path is empty")]
    EmptyMerklePath,

    /// The number of proofs, specs and path keys must all agree
    #[error("number of proofs ({proofs}) does not match number of specs ({specs}) and path keys ({keys})")]
    NumberOfProofsMismatch {
        /// Number of proofs
        proofs: usize,
        /// Number of proof specs
        specs: usize,
        /// Number of keys in the merkle path
        keys: usize,
    },

    /// A proof of the wrong kind was supplied at the given level
    #[error("expected {expected} proof at level {level}")]
    InvalidProofType {
        /// The level in the proof chain
        level: usize,
        /// Expected kind of proof
        expected: &'static str,
    },

    /// The intermediate root could not be computed
    #[error("failed to compute root at level {level}: {reason}")]
    FailedToCalculateRoot {
        /// The level in the proof chain
        level: usize,
        /// Reason reported by the ics23 library
        reason: String,
    },

    /// Membership verification failed at the given level
    #[error("membership verification failed at level {0}")]
    VerifyMembershipFailed(usize),

    /// Non-membership verification failed
    #[error("non-membership verification failed")]
    VerifyNonMembershipFailed,

    /// The computed root does not match the expected commitment root
    #[error("computed root ({computed}) does not match commitment root ({expected})")]
    RootMismatch {
        /// Expected root, hex encoded
        expected: String,
        /// Computed root, hex encoded
        computed: String,
    },

    /// A proof of existence was requested for a missing key
    #[error("key {} is not present in the tree", hex::encode(.0))]
    KeyNotFound(Vec<u8>),

    /// A proof of absence was requested for a present key
    #[error("key {} is present in the tree", hex::encode(.0))]
    KeyExists(Vec<u8>),

    /// The proof bytes could not be decoded
    #[error("failed to decode merkle proof: {0}")]
    DecodeProof(String),
}

/// Errors raised by [`crate::store::MemoryStore`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum StoreError {
    /// No version was committed at the given height
    #[error("no committed version at height {0}")]
    VersionNotFound(u64),

    /// A proof could not be produced
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
}
