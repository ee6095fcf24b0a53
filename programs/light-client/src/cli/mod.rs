//! Contains the command line interface for the application.

use clap::Parser;
use ibc_lc_tendermint_types::TrustThreshold;

/// The command line interface of the light client.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct LightClientCli {
    /// Path of the JSON config file.
    #[clap(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The subcommands of the light client.
#[derive(Clone, Debug, Parser)]
pub enum Commands {
    /// Verify a header against a trusted consensus state.
    UpdateClient(UpdateClientCmd),
    /// Verify a (non-)membership proof against a consensus state.
    VerifyMembership(MembershipCmd),
}

/// The arguments of `update-client`.
///
/// Every JSON argument is either inline JSON or the path of a JSON file.
#[derive(Clone, Debug, Parser)]
#[command(about = "Verify a header and print the updated client and consensus states")]
pub struct UpdateClientCmd {
    /// The client state.
    #[clap(long)]
    pub client_state: String,

    /// The consensus state at the header's trusted height.
    #[clap(long)]
    pub trusted_consensus_state: String,

    /// The header.
    #[clap(long)]
    pub header: String,

    /// Verification time in unix seconds. [default: now]
    #[clap(long)]
    pub now: Option<u64>,

    /// Overrides the commit threshold of the config.
    #[clap(
        long,
        value_parser = parse_trust_threshold,
        help = "Commit threshold as a fraction, e.g. '2/3'",
    )]
    pub commit_threshold: Option<TrustThreshold>,
}

/// The arguments of `verify-membership`.
#[derive(Clone, Debug, Parser)]
#[command(about = "Verify that a value is (or is not) committed under a consensus state")]
pub struct MembershipCmd {
    /// The client state.
    #[clap(long)]
    pub client_state: String,

    /// The consensus state holding the root.
    #[clap(long)]
    pub consensus_state: String,

    /// The commitment prefix of the counterparty store.
    #[clap(long)]
    pub prefix: String,

    /// The merkle proof.
    #[clap(long)]
    pub proof: String,

    /// The path, without the prefix.
    #[clap(long)]
    pub path: String,

    /// The expected value. Non-membership is verified when absent.
    #[clap(long)]
    pub value: Option<String>,
}

/// Parses a fraction such as `2/3`
/// # Errors
/// Returns an error if the fraction is malformed or not a valid threshold
pub fn parse_trust_threshold(input: &str) -> Result<TrustThreshold, String> {
    input.parse().map_err(|e| format!("{e}"))
}
