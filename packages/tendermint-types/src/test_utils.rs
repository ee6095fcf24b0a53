//! Deterministic validators and a header builder for tests, backed by `tendermint-testgen`.

use std::time::Duration;

use ibc_lc_commitment::ProofSpecs;
use tendermint::{block::CommitSig, validator, AppHash, Time};
use tendermint_testgen::{Generator, Header as TestgenHeader, LightBlock};

use crate::{
    chain_id::ChainId, client_state::ClientState, consensus_state::ConsensusState,
    header::Header, height::Height, trust_threshold::TrustThreshold,
};

pub use tendermint_testgen::Validator as TestValidator;

/// Chain id used by the fixtures
pub const CHAIN_ID: &str = "testchain-1";

/// `count` validators with seeds `first_seed..`, each with `voting_power`.
///
/// The same seed always yields the same key.
#[must_use]
pub fn validators(first_seed: u8, count: u8, voting_power: u64) -> Vec<TestValidator> {
    (first_seed..first_seed + count)
        .map(|seed| TestValidator::new(&format!("validator-{seed}")).voting_power(voting_power))
        .collect()
}

/// The public validator set of the given test validators
/// # Panics
/// Panics if a validator cannot be generated
#[must_use]
pub fn validator_set(validators: &[TestValidator]) -> validator::Set {
    validator::Set::without_proposer(
        validators
            .iter()
            .map(|v| v.generate().expect("valid validator"))
            .collect(),
    )
}

/// Block time `seconds` after an arbitrary genesis time
/// # Panics
/// Panics on overflow
#[must_use]
pub fn time(seconds: u64) -> Time {
    let seconds = i64::try_from(seconds).expect("seconds fit i64");
    Time::from_unix_timestamp(1_700_000_000 + seconds, 0).expect("valid time")
}

/// A client state for [`CHAIN_ID`] with a two week trusting period
/// # Panics
/// Panics if the parameters are invalid
#[must_use]
pub fn client_state(latest_height: u64, trust_level: TrustThreshold) -> ClientState {
    let chain_id = ChainId::new(CHAIN_ID).expect("valid chain id");
    ClientState::new(
        chain_id.clone(),
        trust_level,
        Duration::from_secs(14 * 24 * 3600),
        Duration::from_secs(21 * 24 * 3600),
        Duration::from_secs(10),
        Height::new(chain_id.revision_number(), latest_height).expect("valid height"),
        ProofSpecs::default(),
    )
    .expect("valid client state")
}

/// Builds signed headers
#[derive(Clone, Debug)]
pub struct HeaderBuilder {
    chain_id: ChainId,
    header: TestgenHeader,
    trusted_height: u64,
    trusted_validators: Vec<TestValidator>,
    absent: Vec<usize>,
}

impl HeaderBuilder {
    /// A header at `height` and `time` signed by every validator of `signers`.
    ///
    /// Unless overridden, the next validator set equals the signing set and the
    /// header is verified against `height - 1` with the signing set.
    /// # Panics
    /// Panics if the chain id is invalid
    #[must_use]
    pub fn new(height: u64, time: Time, signers: &[TestValidator]) -> Self {
        let header = TestgenHeader::new(signers)
            .chain_id(CHAIN_ID)
            .height(height)
            .time(time)
            .next_validators(signers)
            .app_hash(app_hash(vec![height.to_le_bytes()[0]; 32]));
        Self {
            chain_id: ChainId::new(CHAIN_ID).expect("valid chain id"),
            header,
            trusted_height: height.saturating_sub(1).max(1),
            trusted_validators: signers.to_vec(),
            absent: Vec::new(),
        }
    }

    /// Overrides the chain id
    /// # Panics
    /// Panics if the chain id is empty
    #[must_use]
    pub fn chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = ChainId::new(chain_id).expect("valid chain id");
        self.header = self.header.chain_id(chain_id);
        self
    }

    /// Overrides the application hash
    #[must_use]
    pub fn app_hash(mut self, hash: Vec<u8>) -> Self {
        self.header = self.header.app_hash(app_hash(hash));
        self
    }

    /// Overrides the validator set expected at the next height
    #[must_use]
    pub fn next_validators(mut self, next: &[TestValidator]) -> Self {
        self.header = self.header.next_validators(next);
        self
    }

    /// Verifies the header against the consensus state at `height`, whose next validators are `validators`
    #[must_use]
    pub fn trusted(mut self, height: u64, validators: &[TestValidator]) -> Self {
        self.trusted_height = height;
        self.trusted_validators = validators.to_vec();
        self
    }

    /// The commit slots at the given positions carry no vote
    #[must_use]
    pub fn absent(mut self, indices: &[usize]) -> Self {
        self.absent.extend_from_slice(indices);
        self
    }

    /// Signs the header and assembles the update message
    /// # Panics
    /// Panics if testgen cannot produce the block
    #[must_use]
    pub fn build(self) -> Header {
        let light_block = LightBlock::new_default_with_header(self.header)
            .generate()
            .expect("valid light block");

        let mut signed_header = light_block.signed_header;
        for &index in &self.absent {
            signed_header.commit.signatures[index] = CommitSig::BlockIdFlagAbsent;
        }

        Header {
            signed_header,
            validator_set: light_block.validators,
            trusted_height: Height::new(self.chain_id.revision_number(), self.trusted_height)
                .expect("valid height"),
            trusted_next_validator_set: validator_set(&self.trusted_validators),
        }
    }
}

/// A consensus state at `height` and `time` whose next validator set is `next`
/// # Panics
/// Panics if `height` is zero
#[must_use]
pub fn consensus_state(height: u64, time: Time, next: &[TestValidator]) -> ConsensusState {
    ConsensusState {
        height: Height::new(
            ChainId::new(CHAIN_ID)
                .expect("valid chain id")
                .revision_number(),
            height,
        )
        .expect("valid height"),
        timestamp: time,
        root: vec![height.to_le_bytes()[0]; 32].into(),
        next_validators_hash: validator_set(next).hash(),
    }
}

fn app_hash(bytes: Vec<u8>) -> AppHash {
    AppHash::try_from(bytes).expect("valid app hash")
}
