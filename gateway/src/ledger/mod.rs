//! The ledger seam
//!
//! Everything the registry needs from Solana goes through [`Ledger`]. Each
//! operation is one network round trip and may suspend; none of them retry.

pub mod rpc;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::codec::{ProgramCall, OWNER_OFFSET};
use crate::error::LedgerResult;

pub use rpc::{RpcLedger, RpcLedgerConfig};

/// Proof that a state change was accepted at the configured commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(serialize_with = "crate::api::dto::display")]
    pub signature: Signature,
    /// Slot the transaction landed in
    pub slot: u64,
}

/// Raw account contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// Server-side narrowing of a program account scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFilter {
    /// Leading bytes every account must start with
    pub discriminator: Option<[u8; 8]>,
    /// Only accounts whose owner field equals this key
    pub owner: Option<Pubkey>,
}

impl ProgramFilter {
    /// Same test the RPC node applies with memcmp filters
    pub fn matches(&self, data: &[u8]) -> bool {
        if let Some(disc) = &self.discriminator {
            if data.len() < disc.len() || data[..disc.len()] != disc[..] {
                return false;
            }
        }
        if let Some(owner) = &self.owner {
            let end = OWNER_OFFSET + 32;
            if data.len() < end || data[OWNER_OFFSET..end] != owner.as_ref()[..] {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Program the gateway talks to
    fn program_id(&self) -> Pubkey;

    /// Public key of the signing authority
    fn authority(&self) -> Pubkey;

    /// Sign and send a state-changing call against `locator`
    async fn submit(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<TransactionReceipt>;

    /// Fetch account contents; `NotFound` if the account does not exist
    async fn read(&self, locator: &Pubkey) -> LedgerResult<AccountState>;

    /// Run a read-only program method and return its return data
    async fn call(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<Vec<u8>>;

    /// Every account owned by the program that passes `filter`, unordered
    async fn list_all(&self, filter: &ProgramFilter) -> LedgerResult<Vec<(Pubkey, AccountState)>>;

    /// Current chain height
    async fn slot(&self) -> LedgerResult<u64>;
}
