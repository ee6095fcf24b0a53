//! ICS-24 host paths under which client and connection state is stored.

use ibc_lc_tendermint_types::Height;

use crate::identifiers::{ClientId, ConnectionId};

/// `clients/{client_id}/clientState`
#[must_use]
pub fn client_state(client_id: &ClientId) -> String {
    format!("clients/{client_id}/clientState")
}

/// `clients/{client_id}/consensusStates/`, the prefix of every consensus state of the client
#[must_use]
pub fn consensus_states(client_id: &ClientId) -> String {
    format!("clients/{client_id}/consensusStates/")
}

/// `clients/{client_id}/consensusStates/{revision_number}-{revision_height}`
#[must_use]
pub fn consensus_state(client_id: &ClientId, height: Height) -> String {
    format!("{}{height}", consensus_states(client_id))
}

/// `clients/{client_id}/connections`
#[must_use]
pub fn client_connections(client_id: &ClientId) -> String {
    format!("clients/{client_id}/connections")
}

/// `connections/{connection_id}`
#[must_use]
pub fn connection(connection_id: &ConnectionId) -> String {
    format!("connections/{connection_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::any::ClientType;

    #[test]
    fn paths_follow_ics24() {
        let client_id = ClientId::new(ClientType::Tendermint, 0);
        let height = Height::new(1, 10).unwrap();
        assert_eq!(client_state(&client_id), "clients/07-tendermint-0/clientState");
        assert_eq!(
            consensus_state(&client_id, height),
            "clients/07-tendermint-0/consensusStates/1-10"
        );
        assert_eq!(
            client_connections(&client_id),
            "clients/07-tendermint-0/connections"
        );
        assert_eq!(connection(&ConnectionId::new(3)), "connections/connection-3");
    }
}
