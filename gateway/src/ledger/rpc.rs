//! [`Ledger`] over Solana JSON-RPC
//!
//! Owns the authority keypair. Every round trip is wrapped in a timeout;
//! an expired timeout is reported as `Unavailable`, never retried here.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSimulateTransactionConfig},
    rpc_filter::{Memcmp, RpcFilterType},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::{AccountMeta, Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program,
    transaction::{Transaction, TransactionError},
};

use super::{AccountState, Ledger, ProgramFilter, TransactionReceipt};
use crate::codec::{ProgramCall, ProgramInterface, OWNER_OFFSET};
use crate::error::{LedgerError, LedgerResult};

/// Anchor's error name when a constrained account does not exist
const ACCOUNT_NOT_INITIALIZED: &str = "AccountNotInitialized";

/// System program `AccountAlreadyInUse`; Anchor's own codes start at 100
const SYSTEM_ACCOUNT_IN_USE: u32 = 0;

#[derive(Debug, Clone)]
pub struct RpcLedgerConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub interface: ProgramInterface,
    /// Level `submit` waits for and reads are served at
    pub commitment: CommitmentConfig,
    pub timeout: Duration,
}

pub struct RpcLedger {
    client: RpcClient,
    authority: Keypair,
    program_id: Pubkey,
    interface: ProgramInterface,
    commitment: CommitmentConfig,
    timeout: Duration,
}

impl RpcLedger {
    pub fn new(config: RpcLedgerConfig, authority: Keypair) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url,
            config.timeout,
            config.commitment,
        );

        Self {
            client,
            authority,
            program_id: config.program_id,
            interface: config.interface,
            commitment: config.commitment,
            timeout: config.timeout,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Lamport balance of the authority (fee payer)
    pub async fn authority_balance(&self) -> LedgerResult<u64> {
        self.bounded("getBalance", self.client.get_balance(&self.authority.pubkey()))
            .await
    }

    /// Bind a call to the accounts the program expects for it
    fn instruction(&self, locator: &Pubkey, call: &ProgramCall) -> LedgerResult<Instruction> {
        let accounts = match call {
            ProgramCall::Initialize { .. } => vec![
                AccountMeta::new(self.authority.pubkey(), true), // authority (signer, payer)
                AccountMeta::new(*locator, false),               // product PDA
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            ProgramCall::VerifyProduct { .. } => vec![AccountMeta::new_readonly(*locator, false)],
        };

        let data = call.encode(&self.interface).map_err(|e| {
            LedgerError::rejected(format!("cannot encode {}: {e}", call.method()), Vec::new())
        })?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data,
        })
    }

    async fn bounded<T, F>(&self, op: &str, fut: F) -> LedgerResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(classify_client_error(err)),
            Err(_) => Err(LedgerError::Unavailable(format!(
                "{op} timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn landed_slot(&self, signature: &Signature) -> LedgerResult<u64> {
        let statuses = self
            .bounded(
                "getSignatureStatuses",
                self.client.get_signature_statuses(&[*signature]),
            )
            .await?;

        match statuses.value.first().and_then(|s| s.as_ref()) {
            Some(status) => Ok(status.slot),
            None => self.slot().await,
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn authority(&self) -> Pubkey {
        self.authority.pubkey()
    }

    async fn submit(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<TransactionReceipt> {
        let instruction = self.instruction(locator, &call)?;

        let blockhash = self
            .bounded("getLatestBlockhash", self.client.get_latest_blockhash())
            .await?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.authority.pubkey()),
            &[&self.authority],
            blockhash,
        );

        tracing::debug!(method = call.method(), %locator, "sending transaction");

        let signature = match tokio::time::timeout(
            self.timeout,
            self.client.send_and_confirm_transaction(&transaction),
        )
        .await
        {
            Ok(Ok(signature)) => signature,
            Ok(Err(err)) => return Err(classify_client_error(err)),
            Err(_) => {
                return Err(LedgerError::Unavailable(format!(
                    "transaction {} not confirmed within {}s; outcome unknown",
                    transaction.signatures[0],
                    self.timeout.as_secs()
                )))
            }
        };

        let slot = self.landed_slot(&signature).await?;
        Ok(TransactionReceipt { signature, slot })
    }

    async fn read(&self, locator: &Pubkey) -> LedgerResult<AccountState> {
        let response = self
            .bounded(
                "getAccountInfo",
                self.client.get_account_with_commitment(locator, self.commitment),
            )
            .await?;

        match response.value {
            Some(account) => Ok(AccountState {
                lamports: account.lamports,
                data: account.data,
            }),
            None => Err(LedgerError::NotFound(*locator)),
        }
    }

    async fn call(&self, locator: &Pubkey, call: ProgramCall) -> LedgerResult<Vec<u8>> {
        let instruction = self.instruction(locator, &call)?;
        // Simulated only, so it is never signed
        let transaction = Transaction::new_with_payer(&[instruction], Some(&self.authority.pubkey()));

        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(self.commitment),
            ..Default::default()
        };

        let response = self
            .bounded(
                "simulateTransaction",
                self.client.simulate_transaction_with_config(&transaction, config),
            )
            .await?;
        let result = response.value;

        if let Some(err) = result.err {
            return Err(simulation_error(
                locator,
                err.to_string(),
                result.logs.unwrap_or_default(),
            ));
        }

        match result.return_data {
            Some(return_data) if return_data.program_id == self.program_id.to_string() => STANDARD
                .decode(&return_data.data.0)
                .map_err(|e| LedgerError::rejected(format!("undecodable return data: {e}"), Vec::new())),
            // No return data: the program returned only zero bytes
            _ => Ok(Vec::new()),
        }
    }

    async fn list_all(&self, filter: &ProgramFilter) -> LedgerResult<Vec<(Pubkey, AccountState)>> {
        let mut filters = Vec::new();
        if let Some(discriminator) = filter.discriminator {
            filters.push(RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                0,
                discriminator.to_vec(),
            )));
        }
        if let Some(owner) = filter.owner {
            filters.push(RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                OWNER_OFFSET,
                owner.to_bytes().to_vec(),
            )));
        }

        let config = RpcProgramAccountsConfig {
            filters: (!filters.is_empty()).then_some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .bounded(
                "getProgramAccounts",
                self.client
                    .get_program_accounts_with_config(&self.program_id, config),
            )
            .await?;

        Ok(accounts
            .into_iter()
            .map(|(pubkey, account)| {
                (
                    pubkey,
                    AccountState {
                        lamports: account.lamports,
                        data: account.data,
                    },
                )
            })
            .collect())
    }

    async fn slot(&self) -> LedgerResult<u64> {
        self.bounded("getSlot", self.client.get_slot()).await
    }
}

/// Sort RPC client failures into the ledger taxonomy
///
/// Anything that reached the program (preflight failure, transaction error)
/// is a rejection with its logs; everything else is treated as transport.
/// A transaction that lost a creation race fails on-chain with custom error 0
/// and no logs, so the code alone marks it as account-in-use.
pub(crate) fn classify_client_error(err: ClientError) -> LedgerError {
    let message = err.to_string();
    if let Some(TransactionError::InstructionError(
        _,
        InstructionError::Custom(SYSTEM_ACCOUNT_IN_USE),
    )) = err.get_transaction_error()
    {
        return LedgerError::AccountInUse { message };
    }

    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => LedgerError::rejected(message, result.logs.clone().unwrap_or_default()),
        ClientErrorKind::TransactionError(_) | ClientErrorKind::SigningError(_) => {
            LedgerError::rejected(message, Vec::new())
        }
        _ => LedgerError::Unavailable(message),
    }
}

/// A failed simulation against a missing account is a lookup miss
pub(crate) fn simulation_error(locator: &Pubkey, message: String, logs: Vec<String>) -> LedgerError {
    if logs.iter().any(|line| line.contains(ACCOUNT_NOT_INITIALIZED)) {
        LedgerError::NotFound(*locator)
    } else {
        LedgerError::rejected(message, logs)
    }
}
