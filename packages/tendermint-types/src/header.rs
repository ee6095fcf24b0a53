//! This module defines [`Header`], the message used to update a tendermint client.

use serde::{Deserialize, Serialize};
use tendermint::{block::signed_header::SignedHeader, validator, Time};

use crate::{chain_id::ChainId, height::Height};

/// A signed header of the remote chain together with what is needed to verify it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The new block header and its commit
    pub signed_header: SignedHeader,
    /// The validator set that signed the header
    pub validator_set: validator::Set,
    /// Height of the consensus state the header is verified against
    pub trusted_height: Height,
    /// The validator set the trusted consensus state expects to sign next
    pub trusted_next_validator_set: validator::Set,
}

impl Header {
    /// The chain id of the header
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::from(&self.signed_header.header.chain_id)
    }

    /// The height of the header, with its revision taken from the chain id
    #[must_use]
    pub fn height(&self) -> Height {
        Height {
            revision_number: self.chain_id().revision_number(),
            revision_height: self.signed_header.header.height.value(),
        }
    }

    /// The block time of the header
    #[must_use]
    pub const fn timestamp(&self) -> Time {
        self.signed_header.header.time
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        consensus_state::ConsensusState,
        test_utils::{self, HeaderBuilder},
    };

    use super::*;

    #[test]
    fn height_takes_revision_from_chain_id() {
        let vals = test_utils::validators(1, 2, 10);
        let header = HeaderBuilder::new(7, test_utils::time(1), &vals)
            .chain_id("osmosis-3")
            .build();
        assert_eq!(header.height(), Height::new(3, 7).unwrap());
    }

    #[test]
    fn header_round_trips_through_json() {
        let vals = test_utils::validators(1, 4, 10);
        let header = HeaderBuilder::new(11, test_utils::time(1), &vals)
            .absent(&[1])
            .build();
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(serde_json::from_str::<Header>(&json).unwrap(), header);
    }

    #[test]
    fn validators_hash_matches_the_signing_set() {
        let vals = test_utils::validators(1, 3, 10);
        let header = HeaderBuilder::new(5, test_utils::time(1), &vals).build();
        assert_eq!(
            header.validator_set.hash(),
            header.signed_header.header.validators_hash
        );
        assert_eq!(header.signed_header.commit.signatures.len(), 3);
    }

    #[test]
    fn consensus_state_records_the_header() {
        let vals = test_utils::validators(1, 2, 10);
        let next = test_utils::validators(5, 2, 10);
        let header = HeaderBuilder::new(11, test_utils::time(3), &vals)
            .next_validators(&next)
            .app_hash(vec![9; 32])
            .build();

        let cs = ConsensusState::from(&header);
        assert_eq!(cs.height, header.height());
        assert_eq!(cs.timestamp, test_utils::time(3));
        assert_eq!(cs.root.as_bytes(), [9; 32]);
        assert_eq!(cs.next_validators_hash, test_utils::validator_set(&next).hash());

        let json = serde_json::to_string(&cs).unwrap();
        assert_eq!(serde_json::from_str::<ConsensusState>(&json).unwrap(), cs);
    }
}
