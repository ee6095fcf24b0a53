//! This module defines [`ClientState`].

use std::time::Duration;

use ibc_lc_commitment::ProofSpecs;
use serde::{Deserialize, Serialize};

use crate::{
    chain_id::ChainId, error::ValidationError, height::Height, trust_threshold::TrustThreshold,
};

/// Parameters and progress of a tendermint light client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// The chain being tracked
    pub chain_id: ChainId,
    /// Fraction of a trusted validator set that must sign a non-adjacent header
    pub trust_level: TrustThreshold,
    /// How long a consensus state can be used to verify new headers
    pub trusting_period_seconds: u64,
    /// Unbonding period of the tracked chain
    pub unbonding_period_seconds: u64,
    /// Tolerated clock skew between the chains
    pub max_clock_drift_seconds: u64,
    /// Greatest height of any stored consensus state
    pub latest_height: Height,
    /// The proof system of the tracked chain's state
    #[serde(default)]
    pub proof_specs: ProofSpecs,
    /// Height of the misbehaviour that froze the client, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_height: Option<Height>,
}

impl ClientState {
    /// Creates a new, unfrozen client state
    /// # Errors
    /// Returns an error if the client state is not valid, see [`Self::validate`]
    pub fn new(
        chain_id: ChainId,
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        max_clock_drift: Duration,
        latest_height: Height,
        proof_specs: ProofSpecs,
    ) -> Result<Self, ValidationError> {
        let client_state = Self {
            chain_id,
            trust_level,
            trusting_period_seconds: trusting_period.as_secs(),
            unbonding_period_seconds: unbonding_period.as_secs(),
            max_clock_drift_seconds: max_clock_drift.as_secs(),
            latest_height,
            proof_specs,
            frozen_height: None,
        };
        client_state.validate()?;
        Ok(client_state)
    }

    /// Checks the invariants of a client state
    /// # Errors
    /// Returns the first violated invariant
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chain_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyChainId);
        }
        self.trust_level.validate()?;
        if self.trusting_period_seconds == 0 {
            return Err(ValidationError::ZeroTrustingPeriod);
        }
        if self.trusting_period_seconds >= self.unbonding_period_seconds {
            return Err(ValidationError::TrustingPeriodTooLong {
                trusting: self.trusting_period_seconds,
                unbonding: self.unbonding_period_seconds,
            });
        }
        if self.max_clock_drift_seconds == 0 {
            return Err(ValidationError::ZeroMaxClockDrift);
        }
        if self.latest_height.revision_height == 0 {
            return Err(ValidationError::ZeroHeight);
        }
        self.latest_height.block_height()?;
        let chain_revision = self.chain_id.revision_number();
        if self.latest_height.revision_number != chain_revision {
            return Err(ValidationError::RevisionMismatch {
                chain_revision,
                height_revision: self.latest_height.revision_number,
            });
        }
        if self.proof_specs.is_empty() {
            return Err(ValidationError::EmptyProofSpecs);
        }
        Ok(())
    }

    /// Whether misbehaviour has been detected
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen_height.is_some()
    }

    /// The trusting period
    #[must_use]
    pub const fn trusting_period(&self) -> Duration {
        Duration::from_secs(self.trusting_period_seconds)
    }

    /// The unbonding period
    #[must_use]
    pub const fn unbonding_period(&self) -> Duration {
        Duration::from_secs(self.unbonding_period_seconds)
    }

    /// The max clock drift
    #[must_use]
    pub const fn max_clock_drift(&self) -> Duration {
        Duration::from_secs(self.max_clock_drift_seconds)
    }

    /// The client state after a header at `height` is accepted
    #[must_use]
    pub fn with_header_height(mut self, height: Height) -> Self {
        self.latest_height = self.latest_height.max(height);
        self
    }

    /// The client state after misbehaviour at `height` is detected
    #[must_use]
    pub const fn frozen_at(mut self, height: Height) -> Self {
        self.frozen_height = Some(height);
        self
    }
}
