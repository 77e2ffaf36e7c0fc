//! Registry Gateway - request/response access to the on-chain product registry
//!
//! Registers NFC-tagged products as program-derived accounts, and answers
//! authenticity, lookup and listing queries by reading them back.
//!
//! The pieces, leaf first:
//! - [`derive`]: tag id → account address (pure)
//! - [`ledger`]: the [`ledger::Ledger`] seam and its RPC implementation
//! - [`registry`]: register / verify / fetch / list on top of the two
//! - [`api`]: axum routes mapping HTTP onto the registry

pub mod api;
pub mod codec;
pub mod config;
pub mod derive;
pub mod error;
pub mod idl;
pub mod ledger;
pub mod registry;
pub mod telemetry;



#[cfg(test)]
mod fuzz_tests;

pub use error::{LedgerError, RegistryError};
pub use registry::ProductRegistry;
