//! This module defines [`QueryError`] and [`ParseError`].

use ibc_lc_client::{ClientId, CodecError, ConnectionId};
use ibc_lc_commitment::StoreError;
use ibc_lc_tendermint_types::{Height, ValidationError};

/// Errors raised by queries
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum QueryError {
    /// Nothing has been committed yet
    #[error("no state has been committed")]
    NoCommittedState,

    /// The store cannot serve the query height
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No connection is stored under the identifier
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    /// The client has no connections
    #[error("no connections found for client {0}")]
    ClientConnectionsNotFound(ClientId),

    /// No client state is stored for the client
    #[error("client state of {0} not found")]
    ClientStateNotFound(ClientId),

    /// No consensus state is stored for the client at the height
    #[error("consensus state of {client_id} at {height} not found")]
    ConsensusStateNotFound {
        /// The client
        client_id: ClientId,
        /// The consensus state height
        height: Height,
    },

    /// A connection value cannot be encoded or decoded
    #[error("invalid JSON at {path}: {reason}")]
    Json {
        /// Path of the value
        path: String,
        /// Reason reported by serde
        reason: String,
    },

    /// A stored client value cannot be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The query height is not a valid height
    #[error("invalid query height: {0}")]
    InvalidHeight(#[from] ValidationError),
}

/// Errors raised when reading a prefix or proof argument
#[derive(thiserror::Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ParseError {
    /// The argument is neither inline JSON nor a readable file
    #[error("{input} is neither valid JSON nor a readable file: {source}")]
    Io {
        /// The argument
        input: String,
        /// The error raised when reading the argument as a file
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold valid JSON for the expected type
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// The file
        path: String,
        /// The error raised by the decoder
        #[source]
        source: serde_json::Error,
    },
}
