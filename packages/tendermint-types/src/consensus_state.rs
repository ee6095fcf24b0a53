//! This module defines [`ConsensusState`].

use ibc_lc_commitment::CommitmentRoot;
use serde::{Deserialize, Serialize};
use tendermint::{Hash, Time};

use crate::{header::Header, height::Height};

/// What the client remembers of a verified header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Height of the verified header
    pub height: Height,
    /// Block time of the verified header
    pub timestamp: Time,
    /// Application state root, against which membership proofs are verified
    pub root: CommitmentRoot,
    /// Hash of the validator set expected to sign the next block
    pub next_validators_hash: Hash,
}

impl From<&Header> for ConsensusState {
    fn from(header: &Header) -> Self {
        let block = &header.signed_header.header;
        Self {
            height: header.height(),
            timestamp: block.time,
            root: CommitmentRoot::from_bytes(block.app_hash.as_bytes()),
            next_validators_hash: block.next_validators_hash,
        }
    }
}
