//! Writes the host performs when connections are created.
//!
//! Connection values are stored as JSON at their ICS-24 paths.

use ibc_lc_client::{path, ClientId, ConnectionId};
use ibc_lc_commitment::KvStore;
use serde::{de::DeserializeOwned, Serialize};

use crate::{connection::ConnectionEnd, error::QueryError};

/// Stores `connection` under `connection_id`
/// # Errors
/// Returns an error if the connection cannot be encoded
pub fn set_connection(
    store: &mut impl KvStore,
    connection_id: &ConnectionId,
    connection: &ConnectionEnd,
) -> Result<(), QueryError> {
    let path = path::connection(connection_id);
    let value = encode(&path, connection)?;
    store.set(path.into_bytes(), value);
    Ok(())
}

/// Records `connection_id` among the connections of `client_id`
/// # Errors
/// Returns an error if the stored list cannot be decoded
pub fn add_client_connection(
    store: &mut impl KvStore,
    client_id: &ClientId,
    connection_id: &ConnectionId,
) -> Result<(), QueryError> {
    let path = path::client_connections(client_id);
    let mut connections: Vec<ConnectionId> = match store.get(path.as_bytes()) {
        Some(bytes) => decode(&path, &bytes)?,
        None => Vec::new(),
    };
    if !connections.contains(connection_id) {
        connections.push(connection_id.clone());
    }
    let value = encode(&path, &connections)?;
    store.set(path.into_bytes(), value);
    Ok(())
}

pub(crate) fn encode<T: Serialize>(path: &str, value: &T) -> Result<Vec<u8>, QueryError> {
    serde_json::to_vec(value).map_err(|e| QueryError::Json {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T, QueryError> {
    serde_json::from_slice(bytes).map_err(|e| QueryError::Json {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
