//! Handlers that apply client messages to the stored client state.
//!
//! Each handler reads what it needs through a [`ClientStore`], runs the
//! pure verification of the client type and writes only once verification
//! has passed.

use ibc_lc_commitment::{CommitmentPrefix, MerkleProof};
use ibc_lc_tendermint_membership as membership;
use ibc_lc_tendermint_misbehaviour::{check_for_misbehaviour_on_update, verify_misbehaviour};
use ibc_lc_tendermint_types::{
    tendermint::Time, ClientState, ConsensusState, Height, TrustThreshold,
};
use ibc_lc_tendermint_update_client::{
    check_header_and_update_with_options, ClientValidationCtx, Options, Verifier,
};
use ibc_lc_utils::ensure;

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour, ClientType},
    error::ClientError,
    localhost::LocalhostClientState,
    store::ClientStore,
};

/// Whether a client can be used
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The client verifies headers and proofs
    Active,
    /// Misbehaviour was detected, nothing is verified anymore
    Frozen,
    /// The latest consensus state is older than the trusting period
    Expired,
}

/// The result of a header that passed verification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A consensus state is stored at `height`
    Updated {
        /// Height of the header
        height: Height,
    },
    /// The header conflicts with stored state and the client was frozen
    Misbehaviour {
        /// Height the client was frozen at
        frozen_height: Height,
    },
}

/// Stores the initial client and consensus states of a new client.
///
/// The consensus state is stored at the client's latest height.
/// # Errors
/// Returns an error if the client exists, the states are of different
/// client types or the client state is invalid
#[tracing::instrument(skip_all, fields(client_id = %store.client_id()))]
pub fn create_client(
    store: &mut impl ClientStore,
    client_state: &AnyClientState,
    consensus_state: &AnyConsensusState,
) -> Result<(), ClientError> {
    if store.client_state()?.is_some() {
        return Err(ClientError::ClientAlreadyExists(
            store.client_id().to_string(),
        ));
    }
    if let Some(expected) = store.client_id().client_type() {
        ensure_type(expected, client_state.client_type())?;
    }
    ensure_type(client_state.client_type(), consensus_state.client_type())?;
    if let AnyClientState::Tendermint(cs) = client_state {
        cs.validate()?;
    }

    let height = client_state.latest_height();
    store.set_client_state(client_state)?;
    store.set_consensus_state(height, consensus_state)?;

    tracing::info!(%height, client_type = %client_state.client_type(), "Created client");
    Ok(())
}

/// Verifies `header` and stores its consensus state, with the default commit
/// threshold of two thirds
/// # Errors
/// See [`update_client_with_commit_threshold`]
pub fn update_client(
    store: &mut impl ClientStore,
    header: &AnyHeader,
    now: Time,
    verifier: &impl Verifier,
) -> Result<UpdateOutcome, ClientError> {
    update_client_with_commit_threshold(
        store,
        header,
        now,
        TrustThreshold::TWO_THIRDS,
        verifier,
    )
}

/// Verifies `header` and stores its consensus state.
///
/// A header that verifies but conflicts with an already stored consensus
/// state freezes the client instead; the stored state is kept. Submitting a
/// header whose consensus state is already stored changes nothing.
/// # Errors
/// Returns an error if the client does not exist, is frozen or expired, the
/// header is for another client type or fails verification. Nothing is
/// written on error.
#[tracing::instrument(skip_all, fields(client_id = %store.client_id(), height = %header.height()))]
pub fn update_client_with_commit_threshold(
    store: &mut impl ClientStore,
    header: &AnyHeader,
    now: Time,
    commit_threshold: TrustThreshold,
    verifier: &impl Verifier,
) -> Result<UpdateOutcome, ClientError> {
    let client_state = stored_client_state(&*store)?;
    ensure_type(client_state.client_type(), header.client_type())?;

    if let Some(frozen) = client_state.frozen_height() {
        return Err(ClientError::ClientFrozen(frozen));
    }
    ensure!(
        status_of(&*store, &client_state, now)? == Status::Active,
        ClientError::ClientExpired
    );

    match (client_state, header) {
        (AnyClientState::Tendermint(client_state), AnyHeader::Tendermint(header)) => {
            let anchor = tendermint_consensus_state(&*store, header.trusted_height)?;
            let mut ctx = ClientValidationCtx::new();
            if let Some(anchor) = &anchor {
                ctx.insert_trusted_consensus_state(anchor);
            }
            tracing::debug!(trusted_height = %header.trusted_height, "Verifying header");

            let options = Options::from(&client_state).with_commit_threshold(commit_threshold);
            let (new_client_state, new_consensus_state) = check_header_and_update_with_options(
                &client_state,
                header,
                &ctx,
                now,
                &options,
                verifier,
            )?;
            apply_tendermint_update(store, &client_state, new_client_state, new_consensus_state)
        }
        (AnyClientState::Localhost(client_state), AnyHeader::Localhost(header)) => {
            let (new_client_state, new_consensus_state) =
                client_state.check_header_and_update(header)?;
            let height = header.height;
            store.set_consensus_state(height, &AnyConsensusState::Localhost(new_consensus_state))?;
            store.set_client_state(&AnyClientState::Localhost(new_client_state))?;
            tracing::info!(%height, "Updated localhost client");
            Ok(UpdateOutcome::Updated { height })
        }
        (client_state, header) => Err(ClientError::TypeMismatch {
            expected: client_state.client_type(),
            found: header.client_type(),
        }),
    }
}

fn apply_tendermint_update(
    store: &mut impl ClientStore,
    client_state: &ClientState,
    new_client_state: ClientState,
    new_consensus_state: ConsensusState,
) -> Result<UpdateOutcome, ClientError> {
    let height = new_consensus_state.height;
    let existing = tendermint_consensus_state(&*store, height)?;
    if existing.as_ref() == Some(&new_consensus_state) {
        tracing::info!(%height, "Consensus state already stored");
        return Ok(UpdateOutcome::Updated { height });
    }

    let prev = store
        .prev_consensus_state(height)?
        .map(expect_tendermint)
        .transpose()?;
    let next = store
        .next_consensus_state(height)?
        .map(expect_tendermint)
        .transpose()?;
    if check_for_misbehaviour_on_update(
        &new_consensus_state,
        existing.as_ref(),
        prev.as_ref(),
        next.as_ref(),
    ) {
        let frozen = client_state.clone().frozen_at(height);
        store.set_client_state(&AnyClientState::Tendermint(frozen))?;
        tracing::warn!(%height, "Conflicting header, client frozen");
        return Ok(UpdateOutcome::Misbehaviour {
            frozen_height: height,
        });
    }

    store.set_consensus_state(height, &AnyConsensusState::Tendermint(new_consensus_state))?;
    store.set_client_state(&AnyClientState::Tendermint(new_client_state))?;
    tracing::info!(%height, "Updated client");
    Ok(UpdateOutcome::Updated { height })
}

/// Verifies misbehaviour evidence and freezes the client
/// # Errors
/// Returns an error if the client does not exist, is not a tendermint client,
/// the evidence names another client or fails verification
#[tracing::instrument(skip_all, fields(client_id = %store.client_id()))]
pub fn submit_misbehaviour(
    store: &mut impl ClientStore,
    misbehaviour: &AnyMisbehaviour,
    now: Time,
    verifier: &impl Verifier,
) -> Result<Height, ClientError> {
    let AnyMisbehaviour::Tendermint(misbehaviour) = misbehaviour;
    let client_state = match stored_client_state(&*store)? {
        AnyClientState::Tendermint(cs) => cs,
        other => {
            return Err(ClientError::TypeMismatch {
                expected: other.client_type(),
                found: ClientType::Tendermint,
            })
        }
    };
    if misbehaviour.client_id != store.client_id().as_str() {
        return Err(ClientError::ClientIdMismatch {
            expected: store.client_id().to_string(),
            found: misbehaviour.client_id.clone(),
        });
    }

    let anchors = [
        misbehaviour.header1.trusted_height,
        misbehaviour.header2.trusted_height,
    ]
    .into_iter()
    .map(|height| tendermint_consensus_state(&*store, height))
    .collect::<Result<Vec<_>, _>>()?;
    let mut ctx = ClientValidationCtx::new();
    for anchor in anchors.iter().flatten() {
        ctx.insert_trusted_consensus_state(anchor);
    }

    let frozen_height = verify_misbehaviour(&client_state, misbehaviour, &ctx, now, verifier)?;
    store.set_client_state(&AnyClientState::Tendermint(
        client_state.frozen_at(frozen_height),
    ))?;

    tracing::warn!(%frozen_height, "Misbehaviour submitted, client frozen");
    Ok(frozen_height)
}

/// The status of the client at `now`
/// # Errors
/// Returns an error if the client does not exist or its state cannot be read
pub fn status(store: &impl ClientStore, now: Time) -> Result<Status, ClientError> {
    let client_state = stored_client_state(store)?;
    status_of(store, &client_state, now)
}

fn status_of(
    store: &impl ClientStore,
    client_state: &AnyClientState,
    now: Time,
) -> Result<Status, ClientError> {
    if client_state.frozen_height().is_some() {
        return Ok(Status::Frozen);
    }
    let AnyClientState::Tendermint(client_state) = client_state else {
        return Ok(Status::Active);
    };

    let Some(latest) = tendermint_consensus_state(store, client_state.latest_height)? else {
        return Ok(Status::Expired);
    };
    match latest.timestamp.checked_add(client_state.trusting_period()) {
        Some(expires_at) if expires_at <= now => Ok(Status::Expired),
        _ => Ok(Status::Active),
    }
}

/// Verifies that `value` is stored at `path` in the state committed by the
/// consensus state at `height`
/// # Errors
/// Returns an error if the client is not active at `now`, no consensus state
/// is stored at `height` or the proof does not verify
#[tracing::instrument(skip_all, fields(client_id = %store.client_id(), %height))]
pub fn verify_membership(
    store: &impl ClientStore,
    height: Height,
    prefix: &CommitmentPrefix,
    path: &[u8],
    value: Vec<u8>,
    proof: &MerkleProof,
    now: Time,
) -> Result<(), ClientError> {
    match proof_context(store, height, now)? {
        (AnyClientState::Tendermint(cs), AnyConsensusState::Tendermint(cons)) => {
            membership::verify_membership(&cs, &cons, prefix, path, value, proof)?;
        }
        (AnyClientState::Localhost(_), AnyConsensusState::Localhost(cons)) => {
            LocalhostClientState::verify_membership(&cons, prefix, path, value, proof)?;
        }
        (cs, cons) => return Err(mismatch(&cs, &cons)),
    }
    tracing::debug!("Membership verified");
    Ok(())
}

/// Verifies that nothing is stored at `path` in the state committed by the
/// consensus state at `height`
/// # Errors
/// Returns an error if the client is not active at `now`, no consensus state
/// is stored at `height` or the proof does not verify
#[tracing::instrument(skip_all, fields(client_id = %store.client_id(), %height))]
pub fn verify_non_membership(
    store: &impl ClientStore,
    height: Height,
    prefix: &CommitmentPrefix,
    path: &[u8],
    proof: &MerkleProof,
    now: Time,
) -> Result<(), ClientError> {
    match proof_context(store, height, now)? {
        (AnyClientState::Tendermint(cs), AnyConsensusState::Tendermint(cons)) => {
            membership::verify_non_membership(&cs, &cons, prefix, path, proof)?;
        }
        (AnyClientState::Localhost(_), AnyConsensusState::Localhost(cons)) => {
            LocalhostClientState::verify_non_membership(&cons, prefix, path, proof)?;
        }
        (cs, cons) => return Err(mismatch(&cs, &cons)),
    }
    tracing::debug!("Non-membership verified");
    Ok(())
}

fn proof_context(
    store: &impl ClientStore,
    height: Height,
    now: Time,
) -> Result<(AnyClientState, AnyConsensusState), ClientError> {
    let client_state = stored_client_state(store)?;
    if let Some(frozen) = client_state.frozen_height() {
        return Err(ClientError::ClientFrozen(frozen));
    }
    ensure!(
        status_of(store, &client_state, now)? == Status::Active,
        ClientError::ClientExpired
    );
    let consensus_state = store
        .consensus_state(height)?
        .ok_or(ClientError::ConsensusStateNotFound(height))?;
    Ok((client_state, consensus_state))
}

fn stored_client_state(store: &impl ClientStore) -> Result<AnyClientState, ClientError> {
    store
        .client_state()?
        .ok_or_else(|| ClientError::ClientStateNotFound(store.client_id().to_string()))
}

fn tendermint_consensus_state(
    store: &impl ClientStore,
    height: Height,
) -> Result<Option<ConsensusState>, ClientError> {
    store
        .consensus_state(height)?
        .map(expect_tendermint)
        .transpose()
}

fn expect_tendermint(consensus_state: AnyConsensusState) -> Result<ConsensusState, ClientError> {
    match consensus_state {
        AnyConsensusState::Tendermint(cs) => Ok(cs),
        other @ AnyConsensusState::Localhost(_) => Err(ClientError::TypeMismatch {
            expected: ClientType::Tendermint,
            found: other.client_type(),
        }),
    }
}

fn ensure_type(expected: ClientType, found: ClientType) -> Result<(), ClientError> {
    ensure!(
        expected == found,
        ClientError::TypeMismatch { expected, found }
    );
    Ok(())
}

const fn mismatch(client_state: &AnyClientState, consensus_state: &AnyConsensusState) -> ClientError {
    ClientError::TypeMismatch {
        expected: client_state.client_type(),
        found: consensus_state.client_type(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ibc_lc_tendermint_types::{test_utils, ChainId};
    use rstest::rstest;

    use super::*;
    use crate::{identifiers::ClientId, localhost::LocalhostClientState, store::KvClientStore};

    type Kv = BTreeMap<Vec<u8>, Vec<u8>>;

    fn tendermint_id() -> ClientId {
        ClientId::new(ClientType::Tendermint, 0)
    }

    fn create_tendermint(kv: &mut Kv) {
        let vals = test_utils::validators(1, 4, 10);
        let mut store = KvClientStore::new(kv, tendermint_id());
        create_client(
            &mut store,
            &AnyClientState::Tendermint(test_utils::client_state(10, TrustThreshold::ONE_THIRD)),
            &AnyConsensusState::Tendermint(test_utils::consensus_state(
                10,
                test_utils::time(0),
                &vals,
            )),
        )
        .unwrap();
    }

    #[test]
    fn client_is_created_once() {
        let mut kv = Kv::new();
        create_tendermint(&mut kv);

        let mut store = KvClientStore::new(&mut kv, tendermint_id());
        let client_state = store.client_state().unwrap().unwrap();
        let consensus_state = store
            .consensus_state(client_state.latest_height())
            .unwrap()
            .unwrap();
        let err = create_client(&mut store, &client_state, &consensus_state).unwrap_err();
        assert_eq!(
            err,
            ClientError::ClientAlreadyExists("07-tendermint-0".to_string())
        );
    }

    #[test]
    fn client_id_must_match_client_type() {
        let mut kv = Kv::new();
        let mut store = KvClientStore::new(&mut kv, ClientId::new(ClientType::Localhost, 0));
        let vals = test_utils::validators(1, 1, 10);
        let err = create_client(
            &mut store,
            &AnyClientState::Tendermint(test_utils::client_state(1, TrustThreshold::ONE_THIRD)),
            &AnyConsensusState::Tendermint(test_utils::consensus_state(
                1,
                test_utils::time(0),
                &vals,
            )),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::TypeMismatch {
                expected: ClientType::Localhost,
                found: ClientType::Tendermint,
            }
        );
    }

    #[rstest]
    #[case::fresh(1, Status::Active)]
    #[case::just_before_expiry(14 * 24 * 3600 - 1, Status::Active)]
    #[case::at_expiry(14 * 24 * 3600, Status::Expired)]
    fn status_follows_trusting_period(#[case] elapsed: u64, #[case] expected: Status) {
        let mut kv = Kv::new();
        create_tendermint(&mut kv);
        let store = KvClientStore::new(&mut kv, tendermint_id());
        assert_eq!(status(&store, test_utils::time(elapsed)).unwrap(), expected);
    }

    #[test]
    fn frozen_client_reports_frozen() {
        let mut kv = Kv::new();
        create_tendermint(&mut kv);
        let mut store = KvClientStore::new(&mut kv, tendermint_id());
        let AnyClientState::Tendermint(cs) = store.client_state().unwrap().unwrap() else {
            panic!("tendermint client expected");
        };
        let frozen = cs.frozen_at(Height::new(1, 10).unwrap());
        store
            .set_client_state(&AnyClientState::Tendermint(frozen))
            .unwrap();
        assert_eq!(status(&store, test_utils::time(1)).unwrap(), Status::Frozen);
    }

    #[test]
    fn missing_client_has_no_status() {
        let mut kv = Kv::new();
        let store = KvClientStore::new(&mut kv, tendermint_id());
        assert_eq!(
            status(&store, test_utils::time(1)).unwrap_err(),
            ClientError::ClientStateNotFound("07-tendermint-0".to_string())
        );
    }

    #[test]
    fn localhost_client_follows_host_blocks() {
        let mut kv = Kv::new();
        let chain_id = ChainId::new("host-1").unwrap();
        let mut store = KvClientStore::new(&mut kv, ClientId::new(ClientType::Localhost, 0));
        let root = |b: u8| ibc_lc_commitment::CommitmentRoot::from(vec![b; 32]);
        create_client(
            &mut store,
            &AnyClientState::Localhost(LocalhostClientState {
                chain_id,
                latest_height: Height::new(1, 1).unwrap(),
            }),
            &AnyConsensusState::Localhost(crate::localhost::LocalhostConsensusState {
                height: Height::new(1, 1).unwrap(),
                timestamp: test_utils::time(0),
                root: root(1),
            }),
        )
        .unwrap();

        let header = AnyHeader::Localhost(crate::localhost::LocalhostHeader {
            height: Height::new(1, 2).unwrap(),
            timestamp: test_utils::time(1),
            root: root(2),
        });
        let outcome = update_client(
            &mut store,
            &header,
            test_utils::time(1),
            &ibc_lc_tendermint_update_client::ProdVerifier::default(),
        )
        .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                height: Height::new(1, 2).unwrap()
            }
        );
        assert_eq!(
            store.client_state().unwrap().unwrap().latest_height(),
            Height::new(1, 2).unwrap()
        );
        assert_eq!(status(&store, test_utils::time(1)).unwrap(), Status::Active);
    }

    #[test]
    fn localhost_header_for_tendermint_client_is_rejected() {
        let mut kv = Kv::new();
        create_tendermint(&mut kv);
        let mut store = KvClientStore::new(&mut kv, tendermint_id());
        let header = AnyHeader::Localhost(crate::localhost::LocalhostHeader {
            height: Height::new(1, 11).unwrap(),
            timestamp: test_utils::time(1),
            root: vec![0; 32].into(),
        });
        let err = update_client(
            &mut store,
            &header,
            test_utils::time(1),
            &ibc_lc_tendermint_update_client::ProdVerifier::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::TypeMismatch {
                expected: ClientType::Tendermint,
                found: ClientType::Localhost,
            }
        );
    }
}
