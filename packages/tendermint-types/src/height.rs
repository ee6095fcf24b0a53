//! This module defines [`Height`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tendermint::block;

use crate::error::ValidationError;

/// Largest revision height, bounded by tendermint's signed block height
pub const MAX_REVISION_HEIGHT: u64 = i64::MAX.unsigned_abs();

/// A height on a revisioned chain, ordered by revision number then revision height
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawHeight")]
pub struct Height {
    /// Incremented whenever the chain id changes revision
    pub revision_number: u64,
    /// Block height within the revision
    pub revision_height: u64,
}

impl Height {
    /// Creates a new height
    /// # Errors
    /// Returns an error if `revision_height` is zero or larger than a block height can be
    pub const fn new(revision_number: u64, revision_height: u64) -> Result<Self, ValidationError> {
        if revision_height == 0 {
            return Err(ValidationError::ZeroHeight);
        }
        if revision_height > MAX_REVISION_HEIGHT {
            return Err(ValidationError::HeightOverflow(revision_height));
        }
        Ok(Self {
            revision_number,
            revision_height,
        })
    }

    /// The revision height as a tendermint block height
    /// # Errors
    /// Returns an error if the revision height does not fit a block height
    pub fn block_height(&self) -> Result<block::Height, ValidationError> {
        block::Height::try_from(self.revision_height)
            .map_err(|_| ValidationError::HeightOverflow(self.revision_height))
    }

    /// The next height in the same revision
    #[must_use]
    pub const fn increment(self) -> Self {
        Self {
            revision_number: self.revision_number,
            revision_height: self.revision_height + 1,
        }
    }

    /// The previous height in the same revision, if any
    #[must_use]
    pub const fn decrement(self) -> Option<Self> {
        if self.revision_height <= 1 {
            return None;
        }
        Some(Self {
            revision_number: self.revision_number,
            revision_height: self.revision_height - 1,
        })
    }
}

#[derive(Deserialize)]
struct RawHeight {
    revision_number: u64,
    revision_height: u64,
}

impl TryFrom<RawHeight> for Height {
    type Error = ValidationError;

    fn try_from(raw: RawHeight) -> Result<Self, Self::Error> {
        Self::new(raw.revision_number, raw.revision_height)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for Height {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidHeightFormat(s.to_string());
        let (number, height) = s.split_once('-').ok_or_else(invalid)?;
        let revision_number = number.parse().map_err(|_| invalid())?;
        let revision_height = height.parse().map_err(|_| invalid())?;
        Self::new(revision_number, revision_height)
    }
}
