//! This module defines [`Options`].

use std::time::Duration;

use ibc_lc_tendermint_types::{
    tendermint::trust_threshold::TrustThresholdFraction, ClientState, TrustThreshold,
};
use tendermint_light_client_verifier::options::Options as VerifierOptions;

use crate::error::HeaderError;

/// Parameters of header verification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Fraction of the trusted validator set that must sign a non-adjacent header
    pub trust_threshold: TrustThreshold,
    /// Fraction of the header's own validator set that must sign it, at least 2/3
    pub commit_threshold: TrustThreshold,
    /// How long a consensus state stays usable as a trust anchor
    pub trusting_period: Duration,
    /// Tolerated clock skew between the chains
    pub clock_drift: Duration,
}

impl Options {
    /// Replaces the commit threshold
    #[must_use]
    pub const fn with_commit_threshold(mut self, commit_threshold: TrustThreshold) -> Self {
        self.commit_threshold = commit_threshold;
        self
    }

    /// The options of the tendermint light client verifier
    /// # Errors
    /// Returns an error if the trust threshold is outside [1/3, 1] or the
    /// commit threshold is below 2/3
    pub fn verifier_options(&self) -> Result<VerifierOptions, HeaderError> {
        validate_commit_threshold(self.commit_threshold)?;

        Ok(VerifierOptions {
            trust_threshold: TrustThresholdFraction::try_from(self.trust_threshold)
                .map_err(HeaderError::InvalidOptions)?,
            trusting_period: self.trusting_period,
            // the verifier rejects headers at exactly now + drift, the client accepts them
            clock_drift: self.clock_drift + Duration::from_nanos(1),
        })
    }
}

/// Checks that `threshold` is a valid fraction of at least 2/3
/// # Errors
/// Returns [`HeaderError::CommitThresholdBelowQuorum`] otherwise
pub fn validate_commit_threshold(threshold: TrustThreshold) -> Result<(), HeaderError> {
    let quorum = TrustThreshold::TWO_THIRDS;
    let below_quorum = u128::from(threshold.numerator) * u128::from(quorum.denominator)
        < u128::from(quorum.numerator) * u128::from(threshold.denominator);
    if below_quorum || threshold.validate().is_err() {
        return Err(HeaderError::CommitThresholdBelowQuorum {
            threshold: threshold.to_string(),
        });
    }
    Ok(())
}

impl From<&ClientState> for Options {
    fn from(client_state: &ClientState) -> Self {
        Self {
            trust_threshold: client_state.trust_level,
            commit_threshold: TrustThreshold::TWO_THIRDS,
            trusting_period: client_state.trusting_period(),
            clock_drift: client_state.max_clock_drift(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_lc_tendermint_types::test_utils;
    use rstest::rstest;

    use super::*;

    fn options() -> Options {
        Options::from(&test_utils::client_state(10, TrustThreshold::ONE_THIRD))
    }

    #[rstest]
    #[case::one_third(TrustThreshold::ONE_THIRD)]
    #[case::just_below_quorum(TrustThreshold { numerator: 66, denominator: 100 })]
    #[case::zero_denominator(TrustThreshold { numerator: 2, denominator: 0 })]
    fn commit_threshold_below_quorum_is_rejected(#[case] threshold: TrustThreshold) {
        let err = options()
            .with_commit_threshold(threshold)
            .verifier_options()
            .unwrap_err();
        assert!(matches!(err, HeaderError::CommitThresholdBelowQuorum { .. }));
    }

    #[rstest]
    #[case::quorum(TrustThreshold::TWO_THIRDS)]
    #[case::three_quarters(TrustThreshold { numerator: 3, denominator: 4 })]
    #[case::unanimous(TrustThreshold { numerator: 1, denominator: 1 })]
    fn commit_threshold_at_or_above_quorum_is_accepted(#[case] threshold: TrustThreshold) {
        let verifier_options = options()
            .with_commit_threshold(threshold)
            .verifier_options()
            .unwrap();
        assert_eq!(verifier_options.trust_threshold, TrustThresholdFraction::ONE_THIRD);
        assert_eq!(verifier_options.trusting_period, options().trusting_period);
    }
}
