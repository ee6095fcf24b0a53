//! This module defines the errors of the client layer.

use ibc_lc_commitment::CommitmentError;
use ibc_lc_tendermint_membership::MembershipError;
use ibc_lc_tendermint_misbehaviour::MisbehaviourError;
use ibc_lc_tendermint_types::{Height, ValidationError};
use ibc_lc_tendermint_update_client::UpdateClientError;

use crate::{any::ClientType, localhost::LocalhostError};

/// Errors raised by the client handlers
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ClientError {
    /// A message for one kind of client was sent to another
    #[error("expected {expected} client message, found {found}")]
    TypeMismatch {
        /// Kind of the stored client
        expected: ClientType,
        /// Kind of the message
        found: ClientType,
    },

    /// No client state is stored for the client
    #[error("client state not found for {0}")]
    ClientStateNotFound(String),

    /// A client state is already stored for the client
    #[error("client {0} already exists")]
    ClientAlreadyExists(String),

    /// Misbehaviour evidence names another client
    #[error("misbehaviour for client {found} submitted to client {expected}")]
    ClientIdMismatch {
        /// The client the evidence was submitted to
        expected: String,
        /// The client named by the evidence
        found: String,
    },

    /// No consensus state is stored at the height
    #[error("consensus state not found at height {0}")]
    ConsensusStateNotFound(Height),

    /// The client was frozen after misbehaviour
    #[error("client is frozen at height {0}")]
    ClientFrozen(Height),

    /// The latest consensus state is older than the trusting period
    #[error("client has expired")]
    ClientExpired,

    /// The client or consensus state is not valid
    #[error("invalid state: {0}")]
    InvalidState(#[from] ValidationError),

    /// Header verification failed
    #[error(transparent)]
    Update(#[from] UpdateClientError),

    /// The localhost client rejected its header
    #[error(transparent)]
    Localhost(#[from] LocalhostError),

    /// Misbehaviour verification failed
    #[error(transparent)]
    Misbehaviour(#[from] MisbehaviourError),

    /// Proof verification failed
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Proof verification against a localhost root failed
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    /// A stored value could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A stored key could not be interpreted
    #[error("store error: {0}")]
    Store(String),
}

/// Errors raised when encoding or decoding client types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum CodecError {
    /// The type url is not one of the known client types
    #[error("unknown type url {0}")]
    UnknownTypeUrl(String),

    /// The value is not valid JSON for its type
    #[error("failed to decode {type_url}: {reason}")]
    Json {
        /// Type url of the value
        type_url: String,
        /// Reason reported by the decoder
        reason: String,
    },

    /// The bytes are not a protobuf `Any`
    #[error("failed to decode any: {0}")]
    Protobuf(String),
}

/// Errors raised when parsing identifiers
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum IdentifierError {
    /// The identifier is too short or too long
    #[error("identifier {id} must be between {min} and {max} characters")]
    InvalidLength {
        /// The identifier
        id: String,
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
    },

    /// The identifier contains a character outside of `[a-zA-Z0-9._+\-#\[\]<>]`
    #[error("identifier {0} contains invalid characters")]
    InvalidCharacter(String),

    /// The identifier does not have the expected `{prefix}-{sequence}` form
    #[error("identifier {0} is not of the form {1}-{{sequence}}")]
    InvalidFormat(String, &'static str),
}
