//! State model of the tendermint light client.
//!
//! This crate holds the data the light client stores and verifies: the
//! [`ClientState`] and the per-height [`ConsensusState`]s, the [`Header`]s
//! relayed from the remote chain together with their validator sets, and
//! [`Misbehaviour`] evidence. Blocks, commits and validator sets are the
//! CometBFT types of the [`tendermint`] crate, so hashes and vote sign bytes
//! are those of the remote chain.
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod chain_id;
pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod header;
pub mod height;
pub mod misbehaviour;
pub mod trust_threshold;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use chain_id::ChainId;
pub use client_state::ClientState;
pub use consensus_state::ConsensusState;
pub use error::ValidationError;
pub use header::Header;
pub use height::Height;
pub use misbehaviour::Misbehaviour;
pub use trust_threshold::TrustThreshold;

pub use tendermint;

/// The client type of the tendermint light client
pub const TENDERMINT_CLIENT_TYPE: &str = "07-tendermint";
