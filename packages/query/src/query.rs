//! Dual-mode queries over the committed state of a [`MemoryStore`].

use ibc_lc_client::{path, AnyClientState, AnyConsensusState, ClientId, ConnectionId};
use ibc_lc_commitment::{MemoryStore, MerkleProof};
use ibc_lc_tendermint_types::Height;
use serde::de::DeserializeOwned;

use crate::{connection::ConnectionEnd, error::QueryError, host::decode};

/// A queried value, with a proof of it when one was requested
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResponse<T> {
    /// The value
    pub value: T,
    /// Proof of the value against the app hash at `proof_height`
    pub proof: Option<MerkleProof>,
    /// Height of the state the value was read from
    pub proof_height: Height,
}

/// A client state together with its client identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifiedClientState {
    /// The client
    pub client_id: ClientId,
    /// Its client state
    pub client_state: AnyClientState,
}

/// A consensus state together with its client identifier and height
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifiedConsensusState {
    /// The client
    pub client_id: ClientId,
    /// Height of the consensus state
    pub height: Height,
    /// The consensus state
    pub consensus_state: AnyConsensusState,
}

/// Reads connection and client state from the committed versions of a store
#[derive(Clone, Copy, Debug)]
pub struct QueryClient<'a> {
    store: &'a MemoryStore,
    revision_number: u64,
}

impl<'a> QueryClient<'a> {
    /// Queries `store`, whose versions are heights of revision `revision_number`
    #[must_use]
    pub const fn new(store: &'a MemoryStore, revision_number: u64) -> Self {
        Self {
            store,
            revision_number,
        }
    }

    /// The connection stored under `connection_id`
    /// # Errors
    /// Returns an error if `height` was not committed or the connection is missing
    #[tracing::instrument(skip_all, fields(%connection_id, ?height, prove = prove))]
    pub fn query_connection(
        &self,
        connection_id: &ConnectionId,
        height: Option<u64>,
        prove: bool,
    ) -> Result<QueryResponse<ConnectionEnd>, QueryError> {
        let height = self.query_height(height)?;
        let path = path::connection(connection_id);
        let (value, proof) = self.read(height, &path, prove)?;
        let value = value.ok_or_else(|| QueryError::ConnectionNotFound(connection_id.clone()))?;
        self.respond(&path, &value, proof, height)
    }

    /// The connections of `client_id`
    /// # Errors
    /// Returns an error if `height` was not committed or the client has no connections
    #[tracing::instrument(skip_all, fields(%client_id, ?height, prove = prove))]
    pub fn query_client_connections(
        &self,
        client_id: &ClientId,
        height: Option<u64>,
        prove: bool,
    ) -> Result<QueryResponse<Vec<ConnectionId>>, QueryError> {
        let height = self.query_height(height)?;
        let path = path::client_connections(client_id);
        let (value, proof) = self.read(height, &path, prove)?;
        let value =
            value.ok_or_else(|| QueryError::ClientConnectionsNotFound(client_id.clone()))?;
        self.respond(&path, &value, proof, height)
    }

    /// The client state of the client underlying `connection_id`.
    ///
    /// The connection and the client state are read from the same height.
    /// # Errors
    /// Returns an error if `height` was not committed, or the connection or
    /// its client state is missing
    #[tracing::instrument(skip_all, fields(%connection_id, ?height, prove = prove))]
    pub fn query_connection_client_state(
        &self,
        connection_id: &ConnectionId,
        height: Option<u64>,
        prove: bool,
    ) -> Result<QueryResponse<IdentifiedClientState>, QueryError> {
        let connection = self.query_connection(connection_id, height, prove)?;
        let height = connection.proof_height.revision_height;
        let client_id = connection.value.client_id;

        let (value, proof) = self.read(height, &path::client_state(&client_id), prove)?;
        let value = value.ok_or_else(|| QueryError::ClientStateNotFound(client_id.clone()))?;
        let client_state = AnyClientState::decode(&value)?;
        tracing::debug!(%client_id, "Read client state of connection");

        Ok(QueryResponse {
            value: IdentifiedClientState {
                client_id,
                client_state,
            },
            proof,
            proof_height: connection.proof_height,
        })
    }

    /// The consensus state at `consensus_height` of the client underlying `connection_id`.
    ///
    /// The connection and the consensus state are read from the same height.
    /// # Errors
    /// Returns an error if `height` was not committed, or the connection or
    /// the consensus state is missing
    #[tracing::instrument(skip_all, fields(%connection_id, %consensus_height, ?height, prove = prove))]
    pub fn query_connection_consensus_state(
        &self,
        connection_id: &ConnectionId,
        consensus_height: Height,
        height: Option<u64>,
        prove: bool,
    ) -> Result<QueryResponse<IdentifiedConsensusState>, QueryError> {
        let connection = self.query_connection(connection_id, height, prove)?;
        let height = connection.proof_height.revision_height;
        let client_id = connection.value.client_id;

        let path = path::consensus_state(&client_id, consensus_height);
        let (value, proof) = self.read(height, &path, prove)?;
        let value = value.ok_or_else(|| QueryError::ConsensusStateNotFound {
            client_id: client_id.clone(),
            height: consensus_height,
        })?;
        let consensus_state = AnyConsensusState::decode(&value)?;

        Ok(QueryResponse {
            value: IdentifiedConsensusState {
                client_id,
                height: consensus_height,
                consensus_state,
            },
            proof,
            proof_height: connection.proof_height,
        })
    }

    fn query_height(&self, height: Option<u64>) -> Result<u64, QueryError> {
        match height {
            Some(height) => Ok(height),
            None => self.store.latest_height().ok_or(QueryError::NoCommittedState),
        }
    }

    fn read(
        &self,
        height: u64,
        path: &str,
        prove: bool,
    ) -> Result<(Option<Vec<u8>>, Option<MerkleProof>), QueryError> {
        if prove {
            let (value, proof) = self.store.query_with_proof(height, path.as_bytes())?;
            Ok((value, Some(proof)))
        } else {
            Ok((self.store.get_at(height, path.as_bytes())?, None))
        }
    }

    fn respond<T: DeserializeOwned>(
        &self,
        path: &str,
        value: &[u8],
        proof: Option<MerkleProof>,
        height: u64,
    ) -> Result<QueryResponse<T>, QueryError> {
        Ok(QueryResponse {
            value: decode(path, value)?,
            proof,
            proof_height: Height::new(self.revision_number, height)?,
        })
    }
}
