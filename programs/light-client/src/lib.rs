//! Operator command line for the light client.
//!
//! The commands run the light client verification offline, on client
//! states, headers and proofs given as JSON.
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod cli;
pub mod config;
pub mod observability;
pub mod runners;

