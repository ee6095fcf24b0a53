//! Access to the consensus states a header may be verified against.

use std::collections::{BTreeMap, HashMap};

use ibc_lc_tendermint_types::{ConsensusState, Height};

/// Resolves trusted consensus states by height
pub trait TrustedConsensusStates {
    /// The consensus state stored at `height`, if any
    fn consensus_state(&self, height: Height) -> Option<ConsensusState>;
}

impl TrustedConsensusStates for BTreeMap<Height, ConsensusState> {
    fn consensus_state(&self, height: Height) -> Option<ConsensusState> {
        self.get(&height).cloned()
    }
}

/// Consensus states handed in by the caller, for verification outside of a store
#[derive(Clone, Debug, Default)]
pub struct ClientValidationCtx<'a> {
    trusted_consensus_states: HashMap<Height, &'a ConsensusState>,
}

impl<'a> ClientValidationCtx<'a> {
    /// Creates an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `consensus_state` available at its own height
    pub fn insert_trusted_consensus_state(&mut self, consensus_state: &'a ConsensusState) {
        self.trusted_consensus_states
            .insert(consensus_state.height, consensus_state);
    }
}

impl TrustedConsensusStates for ClientValidationCtx<'_> {
    fn consensus_state(&self, height: Height) -> Option<ConsensusState> {
        self.trusted_consensus_states
            .get(&height)
            .map(|cs| (*cs).clone())
    }
}
