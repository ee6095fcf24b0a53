//! This module defines [`Misbehaviour`].

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, header::Header};

/// Evidence that the tracked chain signed two conflicting headers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehaviour {
    /// The client the evidence is submitted to
    pub client_id: String,
    /// The header at the greater or equal height
    pub header1: Header,
    /// The conflicting header
    pub header2: Header,
}

impl Misbehaviour {
    /// Checks that the headers belong to the same chain and are ordered by height
    /// # Errors
    /// Returns an error if either condition is violated
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        let (chain1, chain2) = (self.header1.chain_id(), self.header2.chain_id());
        if chain1 != chain2 {
            return Err(ValidationError::MisbehaviourChainIdMismatch(
                chain1.to_string(),
                chain2.to_string(),
            ));
        }
        let (height1, height2) = (self.header1.height(), self.header2.height());
        if height1 < height2 {
            return Err(ValidationError::MisbehaviourHeightOrder {
                height1: height1.to_string(),
                height2: height2.to_string(),
            });
        }
        Ok(())
    }
}
