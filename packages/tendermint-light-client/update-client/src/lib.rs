//! Header verification for the tendermint light client.
//!
//! [`check_header_and_update`] verifies a [`Header`] against the consensus
//! state at its trusted height and, if it passes, returns the updated client
//! state and the consensus state to store for the header's height. The
//! function is pure: trusted consensus states are read through
//! [`TrustedConsensusStates`] and nothing is written.
//!
//! Quorum, signature and time checks run through the
//! [`tendermint_light_client_verifier`] [`Verifier`].
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod error;
pub mod options;
pub mod validation;

use ibc_lc_tendermint_types::{
    tendermint::{trust_threshold::TrustThresholdFraction, Time},
    ClientState, ConsensusState, Header, TrustThreshold,
};
use ibc_lc_utils::ensure;
use tendermint_light_client_verifier::{
    errors::VerificationErrorDetail,
    operations::voting_power::{ProdVotingPowerCalculator, VotingPowerCalculator},
    options::Options as VerifierOptions,
    types::{TrustedBlockState, UntrustedBlockState},
    Verdict,
};

pub use error::{HeaderError, UpdateClientError};
pub use options::{validate_commit_threshold, Options};
pub use tendermint_light_client_verifier::{ProdVerifier, Verifier};
pub use validation::{ClientValidationCtx, TrustedConsensusStates};

/// Verifies `header` and computes the resulting client and consensus states,
/// with the default commit threshold of two thirds.
/// # Errors
/// Returns an error if the client is frozen, the trusted consensus state is
/// missing or the header fails verification
pub fn check_header_and_update(
    client_state: &ClientState,
    header: &Header,
    trusted_consensus_states: &impl TrustedConsensusStates,
    now: Time,
    verifier: &impl Verifier,
) -> Result<(ClientState, ConsensusState), UpdateClientError> {
    check_header_and_update_with_options(
        client_state,
        header,
        trusted_consensus_states,
        now,
        &Options::from(client_state),
        verifier,
    )
}

/// Same as [`check_header_and_update`] with explicit verification options
/// # Errors
/// Returns an error if the client is frozen, the trusted consensus state is
/// missing or the header fails verification
pub fn check_header_and_update_with_options(
    client_state: &ClientState,
    header: &Header,
    trusted_consensus_states: &impl TrustedConsensusStates,
    now: Time,
    options: &Options,
    verifier: &impl Verifier,
) -> Result<(ClientState, ConsensusState), UpdateClientError> {
    if let Some(frozen_height) = client_state.frozen_height {
        return Err(UpdateClientError::ClientFrozen(frozen_height));
    }
    client_state.validate()?;

    let anchor = trusted_anchor(header, trusted_consensus_states)?;

    ensure!(
        header.height() > anchor.height,
        HeaderError::HeightNotAdvancing {
            header: header.height(),
            trusted: anchor.height,
        }
        .into()
    );

    verify_header(client_state, header, &anchor, now, options, verifier)?;

    let new_client_state = client_state.clone().with_header_height(header.height());
    Ok((new_client_state, ConsensusState::from(header)))
}

/// Resolves the consensus state at the header's trusted height and checks
/// that the header's trusted validator set is the one it expects
/// # Errors
/// Returns an error if the consensus state is missing or does not match the header
pub fn trusted_anchor(
    header: &Header,
    trusted_consensus_states: &impl TrustedConsensusStates,
) -> Result<ConsensusState, UpdateClientError> {
    let anchor = trusted_consensus_states
        .consensus_state(header.trusted_height)
        .ok_or(UpdateClientError::AnchorNotFound(header.trusted_height))?;

    ensure!(
        anchor.height == header.trusted_height,
        HeaderError::TrustedHeightMismatch {
            header: header.trusted_height,
            consensus: anchor.height,
        }
        .into()
    );

    let trusted_hash = header.trusted_next_validator_set.hash();
    ensure!(
        trusted_hash == anchor.next_validators_hash,
        UpdateClientError::InvalidValidatorSet {
            expected: hex::encode_upper(anchor.next_validators_hash.as_bytes()),
            found: hex::encode_upper(trusted_hash.as_bytes()),
        }
    );

    Ok(anchor)
}

/// Verifies `header` against `anchor` using only the anchor's height, time
/// and next validators hash.
///
/// The caller must have resolved `anchor` at `header.trusted_height`.
/// # Errors
/// Returns the first check the header fails
pub fn verify_header(
    client_state: &ClientState,
    header: &Header,
    anchor: &ConsensusState,
    now: Time,
    options: &Options,
    verifier: &impl Verifier,
) -> Result<(), HeaderError> {
    verify_with(
        client_state,
        header,
        anchor,
        now,
        options,
        |untrusted, trusted, verifier_options| {
            verifier.verify_update_header(untrusted, trusted, verifier_options, now)
        },
    )
}

/// Verifies one header of a misbehaviour against `anchor`.
///
/// Same as [`verify_header`] except that the header may lie beyond the clock
/// drift, as evidence can be submitted late.
/// # Errors
/// Returns the first check the header fails
pub fn verify_misbehaviour_header(
    client_state: &ClientState,
    header: &Header,
    anchor: &ConsensusState,
    now: Time,
    options: &Options,
    verifier: &impl Verifier,
) -> Result<(), HeaderError> {
    verify_with(
        client_state,
        header,
        anchor,
        now,
        options,
        |untrusted, trusted, verifier_options| {
            verifier.verify_misbehaviour_header(untrusted, trusted, verifier_options, now)
        },
    )
}

fn verify_with(
    client_state: &ClientState,
    header: &Header,
    anchor: &ConsensusState,
    now: Time,
    options: &Options,
    verify: impl FnOnce(UntrustedBlockState<'_>, TrustedBlockState<'_>, &VerifierOptions) -> Verdict,
) -> Result<(), HeaderError> {
    validate_basic(client_state, header)?;
    let verifier_options = options.verifier_options()?;

    let trusted = TrustedBlockState {
        chain_id: &header.signed_header.header.chain_id,
        header_time: anchor.timestamp,
        height: anchor
            .height
            .block_height()
            .map_err(HeaderError::InvalidTrustedHeight)?,
        next_validators: &header.trusted_next_validator_set,
        next_validators_hash: anchor.next_validators_hash,
    };
    let untrusted = UntrustedBlockState {
        signed_header: &header.signed_header,
        validators: &header.validator_set,
        next_validators: None,
    };

    match verify(untrusted, trusted, &verifier_options) {
        Verdict::Success => {}
        Verdict::NotEnoughTrust(tally) => {
            return Err(HeaderError::InsufficientTrustedVotingPower {
                signed: tally.tallied,
                total: tally.total,
                threshold: options.trust_threshold.to_string(),
            });
        }
        Verdict::Invalid(detail) => {
            return Err(header_error(detail, header, anchor, now, options));
        }
    }

    check_commit_threshold(header, options.commit_threshold)
}

/// The verifier enforces a quorum of exactly two thirds, stricter thresholds are tallied here
fn check_commit_threshold(header: &Header, threshold: TrustThreshold) -> Result<(), HeaderError> {
    if threshold == TrustThreshold::TWO_THIRDS {
        return Ok(());
    }
    let fraction = TrustThresholdFraction::try_from(threshold).map_err(HeaderError::InvalidOptions)?;
    let tally = ProdVotingPowerCalculator::default()
        .voting_power_in(&header.signed_header, &header.validator_set, fraction)
        .map_err(|e| HeaderError::Verification(e.to_string()))?;
    ensure!(
        threshold.is_met(tally.tallied, tally.total),
        HeaderError::InsufficientCommitVotingPower {
            signed: tally.tallied,
            total: tally.total,
            threshold: threshold.to_string(),
        }
    );
    Ok(())
}

fn header_error(
    detail: VerificationErrorDetail,
    header: &Header,
    anchor: &ConsensusState,
    now: Time,
    options: &Options,
) -> HeaderError {
    match detail {
        VerificationErrorDetail::NotWithinTrustPeriod(_) => HeaderError::TrustingPeriodExpired {
            trusted_time: anchor.timestamp,
            now,
        },
        VerificationErrorDetail::HeaderFromTheFuture(_) => HeaderError::HeaderFromFuture {
            header_time: header.timestamp(),
            now,
        },
        VerificationErrorDetail::NonMonotonicBftTime(_) => HeaderError::NonMonotonicTime {
            header_time: header.timestamp(),
            trusted_time: anchor.timestamp,
        },
        VerificationErrorDetail::InvalidNextValidatorSet(_) => {
            HeaderError::AdjacentValidatorsMismatch
        }
        VerificationErrorDetail::InvalidCommitValue(_) => HeaderError::CommitBlockHashMismatch,
        VerificationErrorDetail::InvalidSignature(_) => HeaderError::InvalidSignature,
        VerificationErrorDetail::DuplicateValidator(_) => HeaderError::DuplicateVote,
        VerificationErrorDetail::NotEnoughTrust(e) => HeaderError::InsufficientTrustedVotingPower {
            signed: e.tally.tallied,
            total: e.tally.total,
            threshold: options.trust_threshold.to_string(),
        },
        VerificationErrorDetail::InsufficientSignersOverlap(e) => {
            HeaderError::InsufficientCommitVotingPower {
                signed: e.tally.tallied,
                total: e.tally.total,
                threshold: TrustThreshold::TWO_THIRDS.to_string(),
            }
        }
        other => HeaderError::Verification(other.to_string()),
    }
}

/// Checks that the header is internally consistent and for the client's chain
fn validate_basic(client_state: &ClientState, header: &Header) -> Result<(), HeaderError> {
    let block = &header.signed_header.header;
    let commit = &header.signed_header.commit;

    let chain_id = header.chain_id();
    ensure!(
        chain_id == client_state.chain_id,
        HeaderError::ChainIdMismatch {
            expected: client_state.chain_id.clone(),
            found: chain_id,
        }
    );
    ensure!(
        header.height().revision_number == header.trusted_height.revision_number,
        HeaderError::RevisionMismatch {
            header: header.height().revision_number,
            trusted: header.trusted_height.revision_number,
        }
    );
    header
        .trusted_height
        .block_height()
        .map_err(HeaderError::InvalidTrustedHeight)?;
    ensure!(
        commit.height == block.height,
        HeaderError::CommitHeightMismatch {
            header: block.height.value(),
            commit: commit.height.value(),
        }
    );
    ensure!(
        header.validator_set.hash() == block.validators_hash,
        HeaderError::ValidatorsHashMismatch
    );

    Ok(())
}
