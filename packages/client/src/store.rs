//! The boundary between the client handlers and the host's storage.

use std::str::FromStr;

use ibc_lc_commitment::KvStore;
use ibc_lc_tendermint_types::Height;

use crate::{
    any::{AnyClientState, AnyConsensusState},
    error::ClientError,
    identifiers::ClientId,
    path,
};

/// Client and consensus state storage of a single client
pub trait ClientStore {
    /// The client the store is scoped to
    fn client_id(&self) -> &ClientId;

    /// The stored client state, if the client exists
    /// # Errors
    /// Returns an error if the stored value cannot be decoded
    fn client_state(&self) -> Result<Option<AnyClientState>, ClientError>;

    /// Stores the client state
    /// # Errors
    /// Returns an error if the value cannot be encoded
    fn set_client_state(&mut self, client_state: &AnyClientState) -> Result<(), ClientError>;

    /// The consensus state stored at `height`, if any
    /// # Errors
    /// Returns an error if the stored value cannot be decoded
    fn consensus_state(&self, height: Height) -> Result<Option<AnyConsensusState>, ClientError>;

    /// Stores a consensus state at `height`
    /// # Errors
    /// Returns an error if the value cannot be encoded
    fn set_consensus_state(
        &mut self,
        height: Height,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), ClientError>;

    /// Heights of every stored consensus state, in ascending order
    /// # Errors
    /// Returns an error if a stored key is not a height
    fn consensus_state_heights(&self) -> Result<Vec<Height>, ClientError>;

    /// The consensus state at the greatest height below `height`
    /// # Errors
    /// Returns an error if the store cannot be read
    fn prev_consensus_state(
        &self,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, ClientError> {
        let heights = self.consensus_state_heights()?;
        match heights.into_iter().rev().find(|h| *h < height) {
            Some(prev) => self.consensus_state(prev),
            None => Ok(None),
        }
    }

    /// The consensus state at the least height above `height`
    /// # Errors
    /// Returns an error if the store cannot be read
    fn next_consensus_state(
        &self,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, ClientError> {
        let heights = self.consensus_state_heights()?;
        match heights.into_iter().find(|h| *h > height) {
            Some(next) => self.consensus_state(next),
            None => Ok(None),
        }
    }
}

/// A [`ClientStore`] over any key-value store, at the ICS-24 paths of the client
#[derive(Debug)]
pub struct KvClientStore<'a, S> {
    store: &'a mut S,
    client_id: ClientId,
}

impl<'a, S: KvStore> KvClientStore<'a, S> {
    /// Scopes `store` to `client_id`
    pub fn new(store: &'a mut S, client_id: ClientId) -> Self {
        Self { store, client_id }
    }
}

impl<S: KvStore> ClientStore for KvClientStore<'_, S> {
    fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    fn client_state(&self) -> Result<Option<AnyClientState>, ClientError> {
        self.store
            .get(path::client_state(&self.client_id).as_bytes())
            .map(|bytes| AnyClientState::decode(&bytes))
            .transpose()
            .map_err(Into::into)
    }

    fn set_client_state(&mut self, client_state: &AnyClientState) -> Result<(), ClientError> {
        let key = path::client_state(&self.client_id).into_bytes();
        self.store.set(key, client_state.encode()?);
        Ok(())
    }

    fn consensus_state(&self, height: Height) -> Result<Option<AnyConsensusState>, ClientError> {
        self.store
            .get(path::consensus_state(&self.client_id, height).as_bytes())
            .map(|bytes| AnyConsensusState::decode(&bytes))
            .transpose()
            .map_err(Into::into)
    }

    fn set_consensus_state(
        &mut self,
        height: Height,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), ClientError> {
        let key = path::consensus_state(&self.client_id, height).into_bytes();
        self.store.set(key, consensus_state.encode()?);
        Ok(())
    }

    fn consensus_state_heights(&self) -> Result<Vec<Height>, ClientError> {
        let prefix = path::consensus_states(&self.client_id);
        let mut heights = self
            .store
            .prefix_iter(prefix.as_bytes())
            .into_iter()
            .map(|(key, _)| {
                let suffix = key.get(prefix.len()..).unwrap_or_default();
                std::str::from_utf8(suffix)
                    .ok()
                    .and_then(|s| Height::from_str(s).ok())
                    .ok_or_else(|| {
                        ClientError::Store(format!(
                            "invalid consensus state key {}",
                            String::from_utf8_lossy(&key)
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // keys sort as strings, so `1-10` comes before `1-9`
        heights.sort_unstable();
        Ok(heights)
    }
}
