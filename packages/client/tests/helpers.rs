//! A tendermint client hosted in an in-memory store

use ibc_lc_client::{
    handler, AnyClientState, AnyConsensusState, AnyHeader, ClientError, ClientId, ClientStore,
    ClientType, KvClientStore, UpdateOutcome,
};
use ibc_lc_commitment::{KvStore, MemoryStore};
use ibc_lc_tendermint_types::{
    test_utils::{self, HeaderBuilder, TestValidator},
    tendermint::Time,
    ClientState, ConsensusState, Header, Height, TrustThreshold,
};
use ibc_lc_tendermint_update_client::ProdVerifier;

/// Height of the consensus state the client is created with
pub const GENESIS_HEIGHT: u64 = 10;

/// A host store holding one tendermint client
pub struct Host {
    pub store: MemoryStore,
    pub client_id: ClientId,
    pub validators: Vec<TestValidator>,
}

impl Host {
    /// Creates the client at [`GENESIS_HEIGHT`] with four validators and trust level one third
    pub fn new() -> Self {
        let mut host = Self {
            store: MemoryStore::new(*b"ibc"),
            client_id: ClientId::new(ClientType::Tendermint, 0),
            validators: test_utils::validators(1, 4, 10),
        };
        let client_state = test_utils::client_state(GENESIS_HEIGHT, TrustThreshold::ONE_THIRD);
        let consensus_state =
            test_utils::consensus_state(GENESIS_HEIGHT, test_utils::time(0), &host.validators);
        handler::create_client(
            &mut host.client_store(),
            &AnyClientState::Tendermint(client_state),
            &AnyConsensusState::Tendermint(consensus_state),
        )
        .unwrap();
        host
    }

    pub fn client_store(&mut self) -> KvClientStore<'_, MemoryStore> {
        KvClientStore::new(&mut self.store, self.client_id.clone())
    }

    /// A header at `height` and `seconds` after genesis, trusted at [`GENESIS_HEIGHT`]
    pub fn header(&self, height: u64, seconds: u64) -> HeaderBuilder {
        HeaderBuilder::new(height, test_utils::time(seconds), &self.validators)
            .trusted(GENESIS_HEIGHT, &self.validators)
    }

    /// Submits `header` at `now`
    pub fn update(&mut self, header: Header, now: Time) -> Result<UpdateOutcome, ClientError> {
        handler::update_client(
            &mut self.client_store(),
            &AnyHeader::Tendermint(header),
            now,
            &ProdVerifier::default(),
        )
    }

    pub fn client_state(&mut self) -> ClientState {
        match self.client_store().client_state().unwrap() {
            Some(AnyClientState::Tendermint(cs)) => cs,
            other => panic!("expected a tendermint client state, found {other:?}"),
        }
    }

    pub fn consensus_state(&mut self, height: u64) -> Option<ConsensusState> {
        let height = Height::new(1, height).unwrap();
        match self.client_store().consensus_state(height).unwrap() {
            Some(AnyConsensusState::Tendermint(cs)) => Some(cs),
            None => None,
            other => panic!("expected a tendermint consensus state, found {other:?}"),
        }
    }

    /// Every key-value pair in the host store
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store.prefix_iter(b"")
    }
}

/// Height `h` in the revision of the test chain
pub fn height(h: u64) -> Height {
    Height::new(1, h).unwrap()
}
