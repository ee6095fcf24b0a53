//! This module defines [`TrustThreshold`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tendermint::trust_threshold::TrustThresholdFraction;

use crate::error::ValidationError;

/// A fraction of voting power that must sign for a header to be trusted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustThreshold {
    /// Numerator of the fraction
    pub numerator: u64,
    /// Denominator of the fraction
    pub denominator: u64,
}

impl TrustThreshold {
    /// One third, the usual trust level
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Two thirds, the commit quorum of tendermint
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Creates a trust threshold
    /// # Errors
    /// Returns an error unless the fraction lies in [1/3, 1]
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ValidationError> {
        let threshold = Self {
            numerator,
            denominator,
        };
        threshold.validate()?;
        Ok(threshold)
    }

    /// Checks that the fraction lies in [1/3, 1], the range tendermint accepts
    /// # Errors
    /// Returns an error otherwise
    pub fn validate(&self) -> Result<(), ValidationError> {
        let below_one_third =
            u128::from(self.numerator) * 3 < u128::from(self.denominator);
        if self.denominator == 0 || below_one_third || self.numerator > self.denominator {
            return Err(ValidationError::InvalidTrustThreshold {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// Whether `signed` is strictly more than this fraction of `total`
    #[must_use]
    pub fn is_met(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl TryFrom<TrustThreshold> for TrustThresholdFraction {
    type Error = ValidationError;

    fn try_from(threshold: TrustThreshold) -> Result<Self, Self::Error> {
        Self::new(threshold.numerator, threshold.denominator).map_err(|_| {
            ValidationError::InvalidTrustThreshold {
                numerator: threshold.numerator,
                denominator: threshold.denominator,
            }
        })
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl fmt::Display for TrustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TrustThreshold {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTrustThresholdFormat(s.to_string());
        let (numerator, denominator) = s.trim().split_once('/').ok_or_else(invalid)?;
        let numerator = numerator.trim().parse().map_err(|_| invalid())?;
        let denominator = denominator.trim().parse().map_err(|_| invalid())?;
        Self::new(numerator, denominator)
    }
}
