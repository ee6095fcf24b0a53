//! Common fixtures for update client tests

use std::collections::BTreeMap;

use ibc_lc_tendermint_types::{
    tendermint::Time,
    test_utils::{self, HeaderBuilder, TestValidator},
    ClientState, ConsensusState, Header, Height, TrustThreshold,
};
use ibc_lc_tendermint_update_client::{check_header_and_update, ProdVerifier, UpdateClientError};

/// Height of the trusted consensus state in every fixture
pub const TRUSTED_HEIGHT: u64 = 10;

/// A client with one trusted consensus state at [`TRUSTED_HEIGHT`]
pub struct Fixture {
    pub validators: Vec<TestValidator>,
    pub client_state: ClientState,
    pub consensus_states: BTreeMap<Height, ConsensusState>,
}

impl Fixture {
    /// Four validators of equal power, trust level one third
    pub fn new() -> Self {
        let validators = test_utils::validators(1, 4, 10);
        let anchor = test_utils::consensus_state(TRUSTED_HEIGHT, anchor_time(), &validators);
        Self {
            client_state: test_utils::client_state(TRUSTED_HEIGHT, TrustThreshold::ONE_THIRD),
            consensus_states: BTreeMap::from([(anchor.height, anchor)]),
            validators,
        }
    }

    /// A header at `height` trusted at [`TRUSTED_HEIGHT`], signed by the fixture's validators
    pub fn header(&self, height: u64, time: Time) -> HeaderBuilder {
        HeaderBuilder::new(height, time, &self.validators).trusted(TRUSTED_HEIGHT, &self.validators)
    }

    /// Runs the update at `now` with the production verifier
    pub fn update(
        &self,
        header: &Header,
        now: Time,
    ) -> Result<(ClientState, ConsensusState), UpdateClientError> {
        check_header_and_update(
            &self.client_state,
            header,
            &self.consensus_states,
            now,
            &ProdVerifier::default(),
        )
    }
}

/// Time of the trusted consensus state
pub fn anchor_time() -> Time {
    test_utils::time(0)
}

/// A time `seconds` after the trusted consensus state
pub fn after_anchor(seconds: u64) -> Time {
    test_utils::time(seconds)
}
