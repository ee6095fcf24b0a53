//! Runner for `update-client`.

use std::{
    io::Write,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Context, Result};
use ibc_lc_query::parse_json_arg;
use ibc_lc_tendermint_types::{tendermint::Time, ClientState, ConsensusState, Header};
use ibc_lc_tendermint_update_client::{
    check_header_and_update_with_options, ClientValidationCtx, Options, ProdVerifier,
};
use serde::Serialize;

use crate::{cli::UpdateClientCmd, config::Config};

/// What `update-client` prints
#[derive(Debug, Serialize)]
struct UpdateClientOutput {
    client_state: ClientState,
    consensus_state: ConsensusState,
}

/// Verifies the header and writes the updated states to `out` as JSON
/// # Errors
/// Returns an error if an argument cannot be parsed or the header fails verification
#[tracing::instrument(skip_all)]
pub fn run(args: &UpdateClientCmd, config: &Config, out: &mut impl Write) -> Result<()> {
    let client_state: ClientState =
        parse_json_arg(&args.client_state).context("invalid client state")?;
    let trusted: ConsensusState = parse_json_arg(&args.trusted_consensus_state)
        .context("invalid trusted consensus state")?;
    let header: Header = parse_json_arg(&args.header).context("invalid header")?;

    let now = match args.now {
        Some(seconds) => unix_time(seconds, 0).context("--now is out of range")?,
        None => {
            let since_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock is before the unix epoch")?;
            unix_time(since_epoch.as_secs(), since_epoch.subsec_nanos())
                .context("system clock is out of range")?
        }
    };
    let commit_threshold = args.commit_threshold.unwrap_or(config.commit_threshold);
    let options = Options::from(&client_state).with_commit_threshold(commit_threshold);

    let mut ctx = ClientValidationCtx::new();
    ctx.insert_trusted_consensus_state(&trusted);

    tracing::info!(
        height = %header.height(),
        trusted_height = %header.trusted_height,
        %commit_threshold,
        "Verifying header"
    );
    let (client_state, consensus_state) = check_header_and_update_with_options(
        &client_state,
        &header,
        &ctx,
        now,
        &options,
        &ProdVerifier::default(),
    )?;
    tracing::info!(latest_height = %client_state.latest_height, "Header verified");

    let output = UpdateClientOutput {
        client_state,
        consensus_state,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn unix_time(seconds: u64, nanos: u32) -> Result<Time> {
    let seconds = i64::try_from(seconds)?;
    Time::from_unix_timestamp(seconds, nanos).map_err(|e| anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use ibc_lc_tendermint_types::{
        test_utils::{self, HeaderBuilder},
        TrustThreshold,
    };
    use ibc_lc_tendermint_update_client::{HeaderError, UpdateClientError};

    use super::*;

    struct Inputs {
        _files: Vec<tempfile::NamedTempFile>,
        args: UpdateClientCmd,
    }

    fn file(value: &impl Serialize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&serde_json::to_vec(value).unwrap()).unwrap();
        file
    }

    fn inputs(absent: &[usize]) -> Inputs {
        let vals = test_utils::validators(1, 4, 10);
        let client_state = test_utils::client_state(10, TrustThreshold::ONE_THIRD);
        let trusted = test_utils::consensus_state(10, test_utils::time(0), &vals);
        let header = HeaderBuilder::new(11, test_utils::time(1), &vals)
            .trusted(10, &vals)
            .absent(absent)
            .build();

        let files = vec![file(&client_state), file(&header)];
        let path = |i: usize| files[i].path().to_str().unwrap().to_string();
        let args = UpdateClientCmd {
            client_state: path(0),
            // inline JSON is accepted as well
            trusted_consensus_state: serde_json::to_string(&trusted).unwrap(),
            header: path(1),
            now: Some(1_700_000_005),
            commit_threshold: None,
        };
        Inputs {
            _files: files,
            args,
        }
    }

    #[test]
    fn prints_the_updated_states() {
        let inputs = inputs(&[]);
        let mut out = Vec::new();
        run(&inputs.args, &Config::default(), &mut out).unwrap();

        let output: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            output["client_state"]["latest_height"]["revision_height"],
            11
        );
        assert_eq!(output["consensus_state"]["height"]["revision_height"], 11);
    }

    #[test]
    fn commit_threshold_comes_from_the_config_unless_overridden() {
        let mut inputs = inputs(&[0]);
        run(&inputs.args, &Config::default(), &mut Vec::new()).unwrap();

        let strict = Config {
            commit_threshold: TrustThreshold::new(3, 4).unwrap(),
            ..Config::default()
        };
        let err = run(&inputs.args, &strict, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UpdateClientError>(),
            Some(UpdateClientError::InvalidHeader(
                HeaderError::InsufficientCommitVotingPower { .. }
            ))
        ));

        inputs.args.commit_threshold = Some(TrustThreshold::TWO_THIRDS);
        run(&inputs.args, &strict, &mut Vec::new()).unwrap();
    }

    #[test]
    fn commit_threshold_below_two_thirds_is_rejected() {
        let mut inputs = inputs(&[]);
        inputs.args.commit_threshold = Some(TrustThreshold::ONE_THIRD);
        let err = run(&inputs.args, &Config::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UpdateClientError>(),
            Some(UpdateClientError::InvalidHeader(
                HeaderError::CommitThresholdBelowQuorum { .. }
            ))
        ));
    }

    #[test]
    fn now_outside_the_time_range_is_rejected() {
        let mut inputs = inputs(&[]);
        inputs.args.now = Some(u64::MAX);
        let err = run(&inputs.args, &Config::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("--now is out of range"));
    }

    #[test]
    fn unreadable_argument_is_reported() {
        let mut inputs = inputs(&[]);
        inputs.args.header = "/nonexistent/header.json".to_string();
        let err = run(&inputs.args, &Config::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("invalid header"));
    }
}
