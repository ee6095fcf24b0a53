//! Common test utilities and fixtures

use ibc_lc_commitment::{CommitmentPrefix, KvStore, MemoryStore, MerkleProof};
use ibc_lc_tendermint_membership::{membership, KVPair, MembershipError, MembershipOutput};
use ibc_lc_tendermint_types::{test_utils, ClientState, ConsensusState, TrustThreshold};

/// Keys committed in every fixture store
pub const ENTRIES: [(&str, &str); 3] = [
    ("clients/07-tendermint-0/clientState", "client"),
    ("connections/connection-0", "connection"),
    ("ports/transfer", "bound"),
];

/// A committed store and a light client that trusts its root
pub struct TestContext {
    pub store: MemoryStore,
    pub height: u64,
    pub client_state: ClientState,
    pub consensus_state: ConsensusState,
    pub prefix: CommitmentPrefix,
}

pub fn setup_test_context() -> TestContext {
    let mut store = MemoryStore::new(*b"ibc");
    for (key, value) in ENTRIES {
        store.set(key.as_bytes().to_vec(), value.as_bytes().to_vec());
    }
    let (height, root) = store.commit();

    let vals = test_utils::validators(1, 1, 10);
    let mut consensus_state = test_utils::consensus_state(height, test_utils::time(0), &vals);
    consensus_state.root = root;

    TestContext {
        prefix: store.prefix(),
        store,
        height,
        client_state: test_utils::client_state(height, TrustThreshold::ONE_THIRD),
        consensus_state,
    }
}

impl TestContext {
    /// Queries `path` with proof and pairs the proof with `value`
    pub fn request(&self, path: &str, value: &str) -> (KVPair, MerkleProof) {
        let (_, proof) = self
            .store
            .query_with_proof(self.height, path.as_bytes())
            .expect("committed height");
        (
            KVPair::new(path.as_bytes().to_vec(), value.as_bytes().to_vec()),
            proof,
        )
    }

    pub fn execute(
        &self,
        requests: Vec<(KVPair, MerkleProof)>,
    ) -> Result<MembershipOutput, MembershipError> {
        membership(
            &self.client_state,
            &self.consensus_state,
            &self.prefix,
            requests.into_iter(),
        )
    }
}
