//! In-memory [`Ledger`] that reproduces the product-registry program
//!
//! Used by tests: creates accounts at the same PDAs the program would, rejects
//! re-initialisation with the system program's "already in use" log (or, in
//! on-chain mode, the bare instruction error a lost race lands with), and
//! counts every round trip so tests can assert none happened.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_sdk::{
    instruction::InstructionError, pubkey::Pubkey, signature::Signature,
    transaction::TransactionError,
};
use tokio::sync::RwLock;

use super::rpc::classify_client_error;
use super::{AccountState, Ledger, ProgramFilter, TransactionReceipt};
use crate::codec::{ProductAccount, ProgramCall, ProgramInterface};
use crate::derive::{validate_nfc_id, validate_product_id, PRODUCT_SEED};
use crate::error::{LedgerError, LedgerResult};

/// Rent-exempt minimum for a 153-byte account
const PRODUCT_RENT_LAMPORTS: u64 = 1_955_760;

pub struct MemoryLedger {
    program_id: Pubkey,
    authority: Pubkey,
    interface: ProgramInterface,
    accounts: RwLock<HashMap<Pubkey, AccountState>>,
    calls: AtomicUsize,
    slot: AtomicU64,
    unavailable: AtomicBool,
    onchain_failures: AtomicBool,
}

impl MemoryLedger {
    pub fn new(program_id: Pubkey, authority: Pubkey) -> Self {
        Self {
            program_id,
            authority,
            interface: ProgramInterface::default(),
            accounts: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            slot: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
            onchain_failures: AtomicBool::new(false),
        }
    }

    /// Number of ledger round trips made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as a network outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Report re-initialisation as a transaction that passed preflight and
    /// failed on-chain, with no logs attached
    pub fn set_onchain_failures(&self, onchain: bool) {
        self.onchain_failures.store(onchain, Ordering::SeqCst);
    }

    /// Place arbitrary bytes at `address`, bypassing the program
    pub async fn insert_raw(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.write().await.insert(
            address,
            AccountState {
                lamports: PRODUCT_RENT_LAMPORTS,
                data,
            },
        );
    }

    fn enter(&self) -> LedgerResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    fn find_pda(&self, owner: &Pubkey, nfc_id: &str) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[PRODUCT_SEED, owner.as_ref(), nfc_id.as_bytes()],
            &self.program_id,
        )
    }

    async fn initialize(
        &self,
        locator: &Pubkey,
        nfc_id: String,
        product_id: String,
    ) -> LedgerResult<()> {
        if validate_nfc_id(&nfc_id).is_err() || validate_product_id(&product_id).is_err() {
            return Err(LedgerError::rejected(
                "Error processing Instruction 0: custom program error: 0x1770",
                vec![format!("Program {} failed: invalid ids", self.program_id)],
            ));
        }

        let (pda, bump) = self.find_pda(&self.authority, &nfc_id);
        if pda != *locator {
            return Err(LedgerError::rejected(
                "Error processing Instruction 0: custom program error: 0x7d6",
                vec!["AnchorError caused by account: product. Error Code: ConstraintSeeds.".into()],
            ));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(locator) {
            if self.onchain_failures.load(Ordering::SeqCst) {
                return Err(classify_client_error(ClientError::from(
                    TransactionError::InstructionError(0, InstructionError::Custom(0)),
                )));
            }
            return Err(LedgerError::rejected(
                "Error processing Instruction 0: custom program error: 0x0",
                vec![format!(
                    "Allocate: account Address {{ address: {locator}, base: None }} already in use"
                )],
            ));
        }

        let record = ProductAccount {
            owner: self.authority,
            nfc_id,
            product_id,
            created_at: chrono::Utc::now().timestamp(),
            bump,
        };
        let data = record
            .encode(&self.interface)
            .map_err(|e| LedgerError::rejected(e.to_string(), Vec::new()))?;
        accounts.insert(
            *locator,
            AccountState {
                lamports: PRODUCT_RENT_LAMPORTS,
                data,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn authority(&self) -> Pubkey {
        self.authority
    }

    async fn submit(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<TransactionReceipt> {
        self.enter()?;

        match call {
            ProgramCall::Initialize { nfc_id, product_id } => {
                self.initialize(locator, nfc_id, product_id).await?
            }
            // Nothing to write; the program only reads
            ProgramCall::VerifyProduct { .. } => {}
        }

        Ok(TransactionReceipt {
            signature: Signature::new_unique(),
            slot: self.slot.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn read(&self, locator: &Pubkey) -> LedgerResult<AccountState> {
        self.enter()?;

        self.accounts
            .read()
            .await
            .get(locator)
            .cloned()
            .ok_or(LedgerError::NotFound(*locator))
    }

    async fn call(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<Vec<u8>> {
        self.enter()?;

        let nfc_id = match call {
            ProgramCall::VerifyProduct { nfc_id } => nfc_id,
            other => {
                return Err(LedgerError::rejected(
                    format!("{} changes state and cannot be simulated", other.method()),
                    Vec::new(),
                ))
            }
        };

        let accounts = self.accounts.read().await;
        let state = accounts.get(locator).ok_or(LedgerError::NotFound(*locator))?;
        let record = ProductAccount::decode(&state.data, &self.interface).map_err(|e| {
            LedgerError::rejected(
                "custom program error: 0xbba",
                vec![format!("AccountDidNotDeserialize: {e}")],
            )
        })?;

        let (pda, _) = self.find_pda(&record.owner, &nfc_id);
        if pda != *locator {
            return Err(LedgerError::rejected(
                "custom program error: 0x7d6",
                vec!["AnchorError caused by account: product. Error Code: ConstraintSeeds.".into()],
            ));
        }

        // Trailing zeros are stripped from return data, so `false` is empty
        if record.nfc_id == nfc_id {
            Ok(vec![1])
        } else {
            Ok(Vec::new())
        }
    }

    async fn list_all(&self, filter: &ProgramFilter) -> LedgerResult<Vec<(Pubkey, AccountState)>> {
        self.enter()?;

        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .filter(|(_, state)| filter.matches(&state.data))
            .map(|(address, state)| (*address, state.clone()))
            .collect())
    }

    async fn slot(&self) -> LedgerResult<u64> {
        self.enter()?;
        Ok(self.slot.load(Ordering::SeqCst))
    }
}
