//! A chain whose IBC store holds one client and one open connection

use ibc_lc_client::{
    handler, AnyClientState, AnyConsensusState, ClientId, ClientType, KvClientStore,
};
use ibc_lc_commitment::{CommitmentPrefix, MemoryStore};
use ibc_lc_query::{host, ConnectionEnd, Counterparty, State, Version};
use ibc_lc_tendermint_types::{test_utils, TrustThreshold};

/// Revision of the queried chain
pub const REVISION: u64 = 4;

pub struct Chain {
    pub store: MemoryStore,
    pub client_id: ClientId,
    pub connection_id: ibc_lc_client::ConnectionId,
}

impl Chain {
    /// Creates the client and the connection and commits them
    pub fn new() -> Self {
        let mut chain = Self {
            store: MemoryStore::new(*b"ibc"),
            client_id: ClientId::new(ClientType::Tendermint, 0),
            connection_id: ibc_lc_client::ConnectionId::new(0),
        };

        let validators = test_utils::validators(1, 4, 10);
        handler::create_client(
            &mut KvClientStore::new(&mut chain.store, chain.client_id.clone()),
            &AnyClientState::Tendermint(test_utils::client_state(10, TrustThreshold::ONE_THIRD)),
            &AnyConsensusState::Tendermint(test_utils::consensus_state(
                10,
                test_utils::time(0),
                &validators,
            )),
        )
        .unwrap();

        host::set_connection(&mut chain.store, &chain.connection_id, &connection(&chain.client_id))
            .unwrap();
        host::add_client_connection(&mut chain.store, &chain.client_id, &chain.connection_id)
            .unwrap();
        chain.store.commit();
        chain
    }
}

pub fn connection(client_id: &ClientId) -> ConnectionEnd {
    ConnectionEnd {
        state: State::Open,
        client_id: client_id.clone(),
        counterparty: Counterparty {
            client_id: ClientId::new(ClientType::Tendermint, 7),
            connection_id: Some(ibc_lc_client::ConnectionId::new(3)),
            prefix: CommitmentPrefix::new(*b"ibc"),
        },
        versions: vec![Version::default()],
        delay_period: 0,
    }
}
