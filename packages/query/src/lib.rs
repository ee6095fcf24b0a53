//! Queries that let one chain prove facts about its state to another.
//!
//! Every query can run in two modes. With `prove` set, the value is read
//! from the committed state at the query height together with a
//! [`MerkleProof`](ibc_lc_commitment::MerkleProof) against that height's
//! app hash. Without it, the same committed state is read without a proof.
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod connection;
pub mod error;
pub mod host;
pub mod parse;
pub mod query;

pub use connection::{ConnectionEnd, Counterparty, IdentifiedConnection, State, Version};
pub use error::{ParseError, QueryError};
pub use parse::{parse_json_arg, parse_prefix, parse_proof};
pub use query::{
    IdentifiedClientState, IdentifiedConsensusState, QueryClient, QueryResponse,
};

