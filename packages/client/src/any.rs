//! Closed sets of client variants and their `Any` encoding.
//!
//! Every variant is wrapped in an [`Any`] whose `type_url` names the variant
//! and whose `value` is the JSON encoding of the inner type. Decoding resolves
//! the type url against the fixed list of known types.

use std::{fmt, str::FromStr};

use ibc_lc_commitment::CommitmentRoot;
use ibc_lc_tendermint_types::{
    tendermint::Time, ClientState, ConsensusState, Header, Height, Misbehaviour,
    TENDERMINT_CLIENT_TYPE,
};
use prost::Message;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::CodecError,
    localhost::{
        LocalhostClientState, LocalhostConsensusState, LocalhostHeader, LOCALHOST_CLIENT_TYPE,
    },
};

/// Type url of a tendermint [`ClientState`]
pub const TENDERMINT_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.ClientState";
/// Type url of a tendermint [`ConsensusState`]
pub const TENDERMINT_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.tendermint.v1.ConsensusState";
/// Type url of a tendermint [`Header`]
pub const TENDERMINT_HEADER_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.Header";
/// Type url of tendermint [`Misbehaviour`]
pub const TENDERMINT_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.Misbehaviour";
/// Type url of a [`LocalhostClientState`]
pub const LOCALHOST_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.localhost.v1.ClientState";
/// Type url of a [`LocalhostConsensusState`]
pub const LOCALHOST_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.localhost.v1.ConsensusState";
/// Type url of a [`LocalhostHeader`]
pub const LOCALHOST_HEADER_TYPE_URL: &str = "/ibc.lightclients.localhost.v1.Header";

/// A type url and the encoded value it names
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Any {
    /// Names the type of `value`
    #[prost(string, tag = "1")]
    pub type_url: String,
    /// The encoded value
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// The kinds of client known to this crate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientType {
    /// Tracks a remote tendermint chain
    Tendermint,
    /// Tracks the host chain itself
    Localhost,
}

impl ClientType {
    /// The identifier prefix of the client type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tendermint => TENDERMINT_CLIENT_TYPE,
            Self::Localhost => LOCALHOST_CLIENT_TYPE,
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TENDERMINT_CLIENT_TYPE => Ok(Self::Tendermint),
            LOCALHOST_CLIENT_TYPE => Ok(Self::Localhost),
            other => Err(CodecError::UnknownTypeUrl(other.to_string())),
        }
    }
}

/// Client state of any known client type
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyClientState {
    /// A tendermint client state
    Tendermint(ClientState),
    /// A localhost client state
    Localhost(LocalhostClientState),
}

/// Consensus state of any known client type
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyConsensusState {
    /// A tendermint consensus state
    Tendermint(ConsensusState),
    /// A localhost consensus state
    Localhost(LocalhostConsensusState),
}

/// Header of any known client type
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyHeader {
    /// A tendermint header
    Tendermint(Header),
    /// A localhost header
    Localhost(LocalhostHeader),
}

/// Misbehaviour of any client type that can misbehave
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyMisbehaviour {
    /// Conflicting tendermint headers
    Tendermint(Misbehaviour),
}

impl AnyClientState {
    /// The client type of the state
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::Localhost(_) => ClientType::Localhost,
        }
    }

    /// The latest height known to the client
    #[must_use]
    pub const fn latest_height(&self) -> Height {
        match self {
            Self::Tendermint(cs) => cs.latest_height,
            Self::Localhost(cs) => cs.latest_height,
        }
    }

    /// The height the client was frozen at, if any
    #[must_use]
    pub const fn frozen_height(&self) -> Option<Height> {
        match self {
            Self::Tendermint(cs) => cs.frozen_height,
            Self::Localhost(_) => None,
        }
    }
}

impl AnyConsensusState {
    /// The client type of the state
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::Localhost(_) => ClientType::Localhost,
        }
    }

    /// The block time recorded by the state
    #[must_use]
    pub const fn timestamp(&self) -> Time {
        match self {
            Self::Tendermint(cs) => cs.timestamp,
            Self::Localhost(cs) => cs.timestamp,
        }
    }

    /// The state root recorded by the state
    #[must_use]
    pub const fn root(&self) -> &CommitmentRoot {
        match self {
            Self::Tendermint(cs) => &cs.root,
            Self::Localhost(cs) => &cs.root,
        }
    }
}

impl AnyHeader {
    /// The client type of the header
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::Localhost(_) => ClientType::Localhost,
        }
    }

    /// The height of the header
    #[must_use]
    pub fn height(&self) -> Height {
        match self {
            Self::Tendermint(header) => header.height(),
            Self::Localhost(header) => header.height,
        }
    }
}

impl AnyMisbehaviour {
    /// The client type of the evidence
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
        }
    }
}

fn pack<T: Serialize>(type_url: &str, value: &T) -> Result<Any, CodecError> {
    let value = serde_json::to_vec(value).map_err(|e| CodecError::Json {
        type_url: type_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Any {
        type_url: type_url.to_string(),
        value,
    })
}

fn unpack<T: DeserializeOwned>(any: &Any) -> Result<T, CodecError> {
    serde_json::from_slice(&any.value).map_err(|e| CodecError::Json {
        type_url: any.type_url.clone(),
        reason: e.to_string(),
    })
}

/// Implements the `Any` conversions and byte codec of a variant enum
macro_rules! any_codec {
    ($any:ident { $($variant:ident($type_url:ident)),+ $(,)? }) => {
        impl $any {
            /// Wraps the value in an [`Any`]
            /// # Errors
            /// Returns an error if the value cannot be serialized
            pub fn to_any(&self) -> Result<Any, CodecError> {
                match self {
                    $(Self::$variant(value) => pack($type_url, value),)+
                }
            }

            /// Encodes the value as protobuf `Any` bytes
            /// # Errors
            /// Returns an error if the value cannot be serialized
            pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
                Ok(self.to_any()?.encode_to_vec())
            }

            /// Decodes a value from protobuf `Any` bytes
            /// # Errors
            /// Returns an error if the bytes are not an `Any` of a known type
            pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
                let any = Any::decode(bytes).map_err(|e| CodecError::Protobuf(e.to_string()))?;
                Self::try_from(&any)
            }
        }

        impl TryFrom<&Any> for $any {
            type Error = CodecError;

            fn try_from(any: &Any) -> Result<Self, Self::Error> {
                match any.type_url.as_str() {
                    $($type_url => Ok(Self::$variant(unpack(any)?)),)+
                    other => Err(CodecError::UnknownTypeUrl(other.to_string())),
                }
            }
        }
    };
}

any_codec!(AnyClientState {
    Tendermint(TENDERMINT_CLIENT_STATE_TYPE_URL),
    Localhost(LOCALHOST_CLIENT_STATE_TYPE_URL),
});
any_codec!(AnyConsensusState {
    Tendermint(TENDERMINT_CONSENSUS_STATE_TYPE_URL),
    Localhost(LOCALHOST_CONSENSUS_STATE_TYPE_URL),
});
any_codec!(AnyHeader {
    Tendermint(TENDERMINT_HEADER_TYPE_URL),
    Localhost(LOCALHOST_HEADER_TYPE_URL),
});
any_codec!(AnyMisbehaviour {
    Tendermint(TENDERMINT_MISBEHAVIOUR_TYPE_URL),
});

#[cfg(test)]
mod tests {
    use ibc_lc_tendermint_types::{
        test_utils::{self, HeaderBuilder},
        TrustThreshold,
    };
    use rstest::rstest;

    use super::*;

    #[test]
    fn tendermint_states_survive_the_codec() {
        let vals = test_utils::validators(1, 4, 10);
        let client_state = AnyClientState::Tendermint(
            test_utils::client_state(10, TrustThreshold::ONE_THIRD)
                .frozen_at(Height::new(1, 9).unwrap()),
        );
        let consensus_state = AnyConsensusState::Tendermint(test_utils::consensus_state(
            10,
            test_utils::time(0),
            &vals,
        ));
        let header = AnyHeader::Tendermint(
            HeaderBuilder::new(11, test_utils::time(1), &vals)
                .absent(&[3])
                .build(),
        );

        let bytes = client_state.encode().unwrap();
        assert_eq!(AnyClientState::decode(&bytes).unwrap(), client_state);
        let bytes = consensus_state.encode().unwrap();
        assert_eq!(AnyConsensusState::decode(&bytes).unwrap(), consensus_state);
        let bytes = header.encode().unwrap();
        assert_eq!(AnyHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn any_carries_the_type_url() {
        let state = AnyClientState::Localhost(LocalhostClientState {
            chain_id: ibc_lc_tendermint_types::ChainId::new("host-1").unwrap(),
            latest_height: Height::new(1, 3).unwrap(),
        });
        let any = state.to_any().unwrap();
        assert_eq!(any.type_url, LOCALHOST_CLIENT_STATE_TYPE_URL);
        assert_eq!(AnyClientState::try_from(&any).unwrap(), state);
    }

    #[rstest]
    #[case::unknown_url("/ibc.lightclients.wasm.v1.ClientState")]
    #[case::consensus_url_for_client_state(TENDERMINT_CONSENSUS_STATE_TYPE_URL)]
    fn unknown_type_urls_are_rejected(#[case] type_url: &str) {
        let any = Any {
            type_url: type_url.to_string(),
            value: b"{}".to_vec(),
        };
        let err = AnyClientState::try_from(&any).unwrap_err();
        assert_eq!(err, CodecError::UnknownTypeUrl(type_url.to_string()));
    }

    #[test]
    fn malformed_value_is_a_json_error() {
        let any = Any {
            type_url: TENDERMINT_HEADER_TYPE_URL.to_string(),
            value: b"not json".to_vec(),
        };
        assert!(matches!(
            AnyHeader::try_from(&any),
            Err(CodecError::Json { .. })
        ));
    }

    #[test]
    fn garbage_bytes_are_a_protobuf_error() {
        assert!(matches!(
            AnyConsensusState::decode(&[0xff, 0xff, 0xff]),
            Err(CodecError::Protobuf(_))
        ));
    }
}
