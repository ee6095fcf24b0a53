//! This module defines [`UpdateClientError`] and [`HeaderError`].

use ibc_lc_tendermint_types::{tendermint::Time, ChainId, Height, ValidationError};

/// Errors raised when a header cannot be used to update the client
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum UpdateClientError {
    /// The client was frozen after misbehaviour
    #[error("client is frozen at height {0}")]
    ClientFrozen(Height),

    /// The stored client state is not valid
    #[error("invalid client state: {0}")]
    InvalidClientState(#[from] ValidationError),

    /// No consensus state is stored at the header's trusted height
    #[error("no consensus state at trusted height {0}")]
    AnchorNotFound(Height),

    /// The header's trusted validator set does not hash to the anchor's next validators hash
    #[error("trusted validator set hash {found} does not match consensus state next validators hash {expected}")]
    InvalidValidatorSet {
        /// Next validators hash of the anchor, hex encoded
        expected: String,
        /// Hash of the supplied trusted validator set, hex encoded
        found: String,
    },

    /// The header failed verification
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] HeaderError),
}

/// Reasons a header fails verification against a trusted consensus state
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum HeaderError {
    /// The consensus state resolved for the trusted height is for another height
    #[error("trusted height {header} does not match consensus state height {consensus}")]
    TrustedHeightMismatch {
        /// Trusted height declared by the header
        header: Height,
        /// Height of the resolved consensus state
        consensus: Height,
    },

    /// The header does not advance past its trusted height
    #[error("header height {header} must be greater than trusted height {trusted}")]
    HeightNotAdvancing {
        /// Height of the header
        header: Height,
        /// Trusted height
        trusted: Height,
    },

    /// The header is for another chain
    #[error("header chain id {found} does not match client chain id {expected}")]
    ChainIdMismatch {
        /// Chain id of the client
        expected: ChainId,
        /// Chain id of the header
        found: ChainId,
    },

    /// The header and its trusted height are in different revisions
    #[error("header revision {header} does not match trusted revision {trusted}")]
    RevisionMismatch {
        /// Revision of the header
        header: u64,
        /// Revision of the trusted height
        trusted: u64,
    },

    /// The commit is for another height
    #[error("commit height {commit} does not match header height {header}")]
    CommitHeightMismatch {
        /// Height of the header
        header: u64,
        /// Height of the commit
        commit: u64,
    },

    /// The commit signs another block
    #[error("commit does not sign the header")]
    CommitBlockHashMismatch,

    /// The supplied validator set does not hash to the header's validators hash
    #[error("validator set does not match the header's validators hash")]
    ValidatorsHashMismatch,

    /// The trusted height cannot be expressed as a tendermint block height
    #[error("invalid trusted height: {0}")]
    InvalidTrustedHeight(#[source] ValidationError),

    /// The verification options are rejected by tendermint
    #[error("invalid verification options: {0}")]
    InvalidOptions(#[source] ValidationError),

    /// The configured commit threshold is below the tendermint commit quorum
    #[error("commit threshold {threshold} is below 2/3")]
    CommitThresholdBelowQuorum {
        /// Configured fraction
        threshold: String,
    },

    /// The trusted consensus state is older than the trusting period
    #[error("trusted consensus state from {trusted_time} expired at {now}")]
    TrustingPeriodExpired {
        /// Time of the trusted consensus state
        trusted_time: Time,
        /// Current time
        now: Time,
    },

    /// The header is too far ahead of the local clock
    #[error("header time {header_time} is after now ({now}) plus max clock drift")]
    HeaderFromFuture {
        /// Time of the header
        header_time: Time,
        /// Current time
        now: Time,
    },

    /// The header is not newer than the trusted consensus state
    #[error("header time {header_time} must be after trusted time {trusted_time}")]
    NonMonotonicTime {
        /// Time of the header
        header_time: Time,
        /// Time of the trusted consensus state
        trusted_time: Time,
    },

    /// An adjacent header is signed by another set than the one the anchor expects
    #[error("adjacent header validators hash does not match trusted next validators hash")]
    AdjacentValidatorsMismatch,

    /// Not enough of the trusted validators signed a non-adjacent header
    #[error("trusted validators signed {signed} of {total} voting power, need more than {threshold}")]
    InsufficientTrustedVotingPower {
        /// Voting power of trusted validators that signed
        signed: u64,
        /// Total voting power of the trusted set
        total: u64,
        /// Required fraction
        threshold: String,
    },

    /// Not enough of the header's validators signed it
    #[error("validators signed {signed} of {total} voting power, need more than {threshold}")]
    InsufficientCommitVotingPower {
        /// Voting power that signed
        signed: u64,
        /// Total voting power of the set
        total: u64,
        /// Required fraction
        threshold: String,
    },

    /// A counted signature does not verify
    #[error("commit carries an invalid signature")]
    InvalidSignature,

    /// A validator voted twice in the same commit
    #[error("commit counts a validator twice")]
    DuplicateVote,

    /// The light client verifier rejected the header for another reason
    #[error("header verification failed: {0}")]
    Verification(String),
}
