use std::path::Path;

use clap::Parser;
use ibc_lc_cli::{
    cli::{Commands, LightClientCli},
    config::Config,
    observability::init_subscriber,
    runners,
};

fn main() -> anyhow::Result<()> {
    let cli = LightClientCli::parse();
    let config = Config::load(cli.config.as_deref().map(Path::new))?;
    init_subscriber(&config)?;
    tracing::debug!(?config, "Loaded config");

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::UpdateClient(args) => runners::update_client::run(&args, &config, &mut stdout),
        Commands::VerifyMembership(args) => runners::membership::run(&args, &mut stdout),
    }
}
