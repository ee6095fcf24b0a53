//! This module defines [`ValidationError`].

/// Errors raised when constructing or validating light client types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Revision height zero is reserved
    #[error("revision height cannot be zero")]
    ZeroHeight,

    /// The revision height does not fit a tendermint block height
    #[error("revision height {0} exceeds the maximum block height")]
    HeightOverflow(u64),

    /// The height string is not of the form `{revision_number}-{revision_height}`
    #[error("invalid height: {0}")]
    InvalidHeightFormat(String),

    /// The chain id is empty
    #[error("chain id cannot be empty")]
    EmptyChainId,

    /// The trust threshold is not a valid fraction in [1/3, 1]
    #[error("invalid trust threshold {numerator}/{denominator}")]
    InvalidTrustThreshold {
        /// Numerator of the fraction
        numerator: u64,
        /// Denominator of the fraction
        denominator: u64,
    },

    /// The trust threshold string is not of the form `n/d`
    #[error("invalid trust threshold format: {0}")]
    InvalidTrustThresholdFormat(String),

    /// The trusting period must be non-zero
    #[error("trusting period cannot be zero")]
    ZeroTrustingPeriod,

    /// The trusting period must be shorter than the unbonding period
    #[error("trusting period ({trusting}s) must be shorter than unbonding period ({unbonding}s)")]
    TrustingPeriodTooLong {
        /// Trusting period in seconds
        trusting: u64,
        /// Unbonding period in seconds
        unbonding: u64,
    },

    /// The max clock drift must be non-zero
    #[error("max clock drift cannot be zero")]
    ZeroMaxClockDrift,

    /// The latest height's revision does not match the chain id
    #[error("latest height revision {height_revision} does not match chain id revision {chain_revision}")]
    RevisionMismatch {
        /// Revision number derived from the chain id
        chain_revision: u64,
        /// Revision number of the height
        height_revision: u64,
    },

    /// The client expects no proofs
    #[error("proof specs cannot be empty")]
    EmptyProofSpecs,

    /// The two headers of a misbehaviour are for different chains
    #[error("misbehaviour headers have different chain ids ({0} and {1})")]
    MisbehaviourChainIdMismatch(String, String),

    /// The first header of a misbehaviour must not be lower than the second
    #[error("misbehaviour header1 height ({height1}) is lower than header2 height ({height2})")]
    MisbehaviourHeightOrder {
        /// Height of the first header
        height1: String,
        /// Height of the second header
        height2: String,
    },
}
