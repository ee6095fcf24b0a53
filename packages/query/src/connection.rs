//! This module defines [`ConnectionEnd`] and the types it is made of.

use ibc_lc_client::{ClientId, ConnectionId};
use ibc_lc_commitment::CommitmentPrefix;
use serde::{Deserialize, Serialize};

/// Handshake state of a connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Default state
    Uninitialized,
    /// The connection was opened on this chain
    Init,
    /// The connection was opened on this chain in response to the counterparty
    TryOpen,
    /// The handshake has completed
    Open,
}

/// A connection version and the channel features it supports
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Version identifier
    pub identifier: String,
    /// Channel orderings supported under the version
    pub features: Vec<String>,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            identifier: "1".to_string(),
            features: vec!["ORDER_ORDERED".to_string(), "ORDER_UNORDERED".to_string()],
        }
    }
}

/// The other end of a connection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Client on the counterparty that tracks this chain
    pub client_id: ClientId,
    /// Connection identifier on the counterparty, unknown until it opens its end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,
    /// Prefix of the counterparty's IBC store
    pub prefix: CommitmentPrefix,
}

/// One end of a connection between two chains
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEnd {
    /// Handshake state
    pub state: State,
    /// Client on this chain that tracks the counterparty
    pub client_id: ClientId,
    /// The counterparty's end
    pub counterparty: Counterparty,
    /// Versions compatible with the connection
    pub versions: Vec<Version>,
    /// Delay before packets may be processed, in nanoseconds
    pub delay_period: u64,
}

/// A connection together with its identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedConnection {
    /// Identifier of the connection
    pub connection_id: ConnectionId,
    /// The connection
    #[serde(flatten)]
    pub connection_end: ConnectionEnd,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::init(State::Init, "\"INIT\"")]
    #[case::try_open(State::TryOpen, "\"TRY_OPEN\"")]
    #[case::open(State::Open, "\"OPEN\"")]
    fn states_use_protobuf_names(#[case] state: State, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&state).unwrap(), json);
    }

    #[test]
    fn counterparty_connection_id_is_optional() {
        let json = r#"{"client_id":"07-tendermint-3","prefix":{"key_prefix":"696263"}}"#;
        let counterparty: Counterparty = serde_json::from_str(json).unwrap();
        assert_eq!(counterparty.connection_id, None);
        assert_eq!(counterparty.prefix, CommitmentPrefix::new(*b"ibc"));
        assert_eq!(serde_json::to_string(&counterparty).unwrap(), json);
    }
}
