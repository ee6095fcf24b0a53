//! Runner for `verify-membership`.

use std::io::Write;

use anyhow::{Context, Result};
use ibc_lc_query::{parse_json_arg, parse_prefix, parse_proof};
use ibc_lc_tendermint_membership::{verify_membership, verify_non_membership};
use ibc_lc_tendermint_types::{ClientState, ConsensusState};

use crate::cli::MembershipCmd;

/// Verifies the proof and writes the verified root to `out`
/// # Errors
/// Returns an error if an argument cannot be parsed or the proof does not verify
#[tracing::instrument(skip_all, fields(path = %args.path))]
pub fn run(args: &MembershipCmd, out: &mut impl Write) -> Result<()> {
    let client_state: ClientState =
        parse_json_arg(&args.client_state).context("invalid client state")?;
    let consensus_state: ConsensusState =
        parse_json_arg(&args.consensus_state).context("invalid consensus state")?;
    let prefix = parse_prefix(&args.prefix).context("invalid prefix")?;
    let proof = parse_proof(&args.proof).context("invalid proof")?;
    let path = args.path.as_bytes();

    if let Some(value) = &args.value {
        verify_membership(
            &client_state,
            &consensus_state,
            &prefix,
            path,
            value.clone().into_bytes(),
            &proof,
        )?;
        tracing::info!("Membership verified");
    } else {
        verify_non_membership(&client_state, &consensus_state, &prefix, path, &proof)?;
        tracing::info!("Non-membership verified");
    }

    writeln!(
        out,
        "verified against root {} at height {}",
        consensus_state.root, consensus_state.height
    )?;
    Ok(())
}
