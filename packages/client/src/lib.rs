//! The client layer around the light client verifiers.
//!
//! This crate dispatches over the known client kinds ([`ClientType`]), reads
//! and writes client and consensus states through the [`ClientStore`]
//! boundary and applies updates, misbehaviour and membership checks to the
//! stored state.
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod any;
pub mod error;
pub mod handler;
pub mod identifiers;
pub mod localhost;
pub mod path;
pub mod store;

pub use any::{Any, AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour, ClientType};
pub use error::{ClientError, CodecError, IdentifierError};
pub use handler::{Status, UpdateOutcome};
pub use identifiers::{ClientId, ConnectionId};
pub use store::{ClientStore, KvClientStore};
