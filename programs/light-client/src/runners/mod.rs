//! Implementations of the subcommands.

pub mod membership;
pub mod update_client;
