//! Client and connection identifiers as defined by ICS-24.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{any::ClientType, error::IdentifierError};

const CONNECTION_PREFIX: &str = "connection";

/// Identifier of a client, `{client_type}-{sequence}`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// The identifier of the `sequence`th client of `client_type`
    #[must_use]
    pub fn new(client_type: ClientType, sequence: u64) -> Self {
        Self(format!("{}-{sequence}", client_type.as_str()))
    }

    /// The identifier as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The client type encoded in the identifier, if it is a known one
    #[must_use]
    pub fn client_type(&self) -> Option<ClientType> {
        let (prefix, _) = self.0.rsplit_once('-')?;
        ClientType::from_str(prefix).ok()
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier(s, 9, 64)?;
        let (prefix, sequence) = s
            .rsplit_once('-')
            .ok_or_else(|| IdentifierError::InvalidFormat(s.to_string(), "{client_type}"))?;
        if prefix.is_empty() || sequence.parse::<u64>().is_err() {
            return Err(IdentifierError::InvalidFormat(s.to_string(), "{client_type}"));
        }
        Ok(Self(s.to_string()))
    }
}

/// Identifier of a connection, `connection-{sequence}`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionId(String);

impl ConnectionId {
    /// The identifier of the `sequence`th connection
    #[must_use]
    pub fn new(sequence: u64) -> Self {
        Self(format!("{CONNECTION_PREFIX}-{sequence}"))
    }

    /// The identifier as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConnectionId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier(s, 10, 64)?;
        match s.split_once('-') {
            Some((CONNECTION_PREFIX, sequence)) if sequence.parse::<u64>().is_ok() => {
                Ok(Self(s.to_string()))
            }
            _ => Err(IdentifierError::InvalidFormat(
                s.to_string(),
                CONNECTION_PREFIX,
            )),
        }
    }
}

macro_rules! impl_string_conversions {
    ($id:ty) => {
        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $id {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$id> for String {
            fn from(id: $id) -> Self {
                id.0
            }
        }
    };
}

impl_string_conversions!(ClientId);
impl_string_conversions!(ConnectionId);

/// Checks the length and alphabet of an ICS-24 identifier
/// # Errors
/// Returns an error if the identifier is too short, too long or contains a
/// character outside of `[a-zA-Z0-9._+\-#\[\]<>]`
pub fn validate_identifier(id: &str, min: usize, max: usize) -> Result<(), IdentifierError> {
    if !(min..=max).contains(&id.len()) {
        return Err(IdentifierError::InvalidLength {
            id: id.to_string(),
            min,
            max,
        });
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || "._+-#[]<>".contains(c);
    if !id.chars().all(allowed) {
        return Err(IdentifierError::InvalidCharacter(id.to_string()));
    }
    Ok(())
}
