//! Commitment roots, Merkle paths and ICS-23 proofs.
//!
//! Besides verifying proofs received from a counterparty, this crate can also
//! produce them: [`tree::SimpleMerkleTree`] builds Tendermint-style Merkle
//! trees whose proofs verify under [`ics23::tendermint_spec`], and
//! [`store::MemoryStore`] keeps committed versions of a key-value store so
//! reads and proofs can be served at any committed height.
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod commitment;
pub mod error;
pub mod merkle;
pub mod specs;
pub mod store;
pub mod tree;

pub use commitment::{CommitmentPrefix, CommitmentRoot};
pub use error::{CommitmentError, StoreError};
pub use merkle::{MerklePath, MerkleProof};
pub use specs::{ProofSpecKind, ProofSpecs};
pub use store::{KvStore, MemoryStore};

/// A SHA-256 digest.
pub type Hash = [u8; 32];
