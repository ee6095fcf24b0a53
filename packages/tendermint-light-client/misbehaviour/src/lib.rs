//! Misbehaviour detection for the tendermint light client.
//!
//! Two headers are misbehaviour when they conflict at the same height or
//! when a higher header is not later in time. [`verify_misbehaviour`] checks
//! that both headers would pass verification on their own before accepting
//! the evidence, so a client is only frozen on signatures of its trusted
//! validators.
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

use ibc_lc_tendermint_types::{
    tendermint::Time, ClientState, ConsensusState, Header, Height, Misbehaviour, ValidationError,
};
use ibc_lc_tendermint_update_client::{
    trusted_anchor, verify_misbehaviour_header, HeaderError, Options, TrustedConsensusStates,
    UpdateClientError, Verifier,
};

/// Errors raised when misbehaviour evidence is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MisbehaviourError {
    /// The client is already frozen
    #[error("client is frozen at height {0}")]
    ClientFrozen(Height),
    /// The evidence is malformed
    #[error("invalid misbehaviour: {0}")]
    InvalidMisbehaviour(#[from] ValidationError),
    /// The first header does not verify
    #[error("header1 failed verification: {0}")]
    Header1(#[source] UpdateClientError),
    /// The second header does not verify
    #[error("header2 failed verification: {0}")]
    Header2(#[source] UpdateClientError),
    /// Both headers verify but do not conflict
    #[error("headers do not constitute misbehaviour")]
    NotMisbehaviour,
}

/// Verifies misbehaviour evidence and returns the height to freeze the client at.
///
/// Each header is verified against the consensus state at its own trusted height,
/// without the clock drift bound.
/// # Errors
/// Returns an error if the client is frozen, the evidence is malformed, either
/// header fails verification or the headers do not conflict
pub fn verify_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
    trusted_consensus_states: &impl TrustedConsensusStates,
    now: Time,
    verifier: &impl Verifier,
) -> Result<Height, MisbehaviourError> {
    if let Some(height) = client_state.frozen_height {
        return Err(MisbehaviourError::ClientFrozen(height));
    }
    misbehaviour.validate_basic()?;

    let options = Options::from(client_state);
    verify_single_header(
        client_state,
        &misbehaviour.header1,
        trusted_consensus_states,
        now,
        &options,
        verifier,
    )
    .map_err(MisbehaviourError::Header1)?;
    verify_single_header(
        client_state,
        &misbehaviour.header2,
        trusted_consensus_states,
        now,
        &options,
        verifier,
    )
    .map_err(MisbehaviourError::Header2)?;

    if !check_for_misbehaviour(&misbehaviour.header1, &misbehaviour.header2) {
        return Err(MisbehaviourError::NotMisbehaviour);
    }

    Ok(misbehaviour.header1.height())
}

fn verify_single_header(
    client_state: &ClientState,
    header: &Header,
    trusted_consensus_states: &impl TrustedConsensusStates,
    now: Time,
    options: &Options,
    verifier: &impl Verifier,
) -> Result<(), UpdateClientError> {
    let anchor = trusted_anchor(header, trusted_consensus_states)?;
    if header.height() <= anchor.height {
        return Err(HeaderError::HeightNotAdvancing {
            header: header.height(),
            trusted: anchor.height,
        }
        .into());
    }
    verify_misbehaviour_header(client_state, header, &anchor, now, options, verifier)?;
    Ok(())
}

/// Whether two headers conflict: same height with different blocks, or a
/// higher `header1` whose time is not after `header2`
#[must_use]
pub fn check_for_misbehaviour(header1: &Header, header2: &Header) -> bool {
    let (height1, height2) = (header1.height(), header2.height());
    if height1 == height2 {
        return header1.signed_header.commit.block_id != header2.signed_header.commit.block_id;
    }
    height1 > height2 && header1.timestamp() <= header2.timestamp()
}

/// Whether storing `new` would conflict with the consensus states already stored.
///
/// `existing` is the state at the same height, `prev` and `next` the closest
/// states below and above it. A state identical to `existing` is not a conflict.
#[must_use]
pub fn check_for_misbehaviour_on_update(
    new: &ConsensusState,
    existing: Option<&ConsensusState>,
    prev: Option<&ConsensusState>,
    next: Option<&ConsensusState>,
) -> bool {
    if let Some(existing) = existing {
        return existing != new;
    }
    if prev.is_some_and(|prev| prev.timestamp >= new.timestamp) {
        return true;
    }
    next.is_some_and(|next| next.timestamp <= new.timestamp)
}
