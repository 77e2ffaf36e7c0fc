//! Error taxonomy for the gateway
//!
//! [`LedgerError`] is what the ledger seam reports; [`RegistryError`] is the
//! closed set of outcomes callers of the registry can observe.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Marker the system program logs when asked to create an existing account
const ACCOUNT_IN_USE: &str = "already in use";

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Network failure or timeout; safe to retry for reads only
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The program or runtime refused the call
    #[error("ledger rejected call: {message}")]
    Rejected { message: String, logs: Vec<String> },

    /// The system program refused to create an account that already exists
    #[error("account already in use: {message}")]
    AccountInUse { message: String },

    #[error("no account at {0}")]
    NotFound(Pubkey),
}

impl LedgerError {
    pub fn rejected(message: impl Into<String>, logs: Vec<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            logs,
        }
    }

    /// True when the rejection came from creating an account that already exists
    pub fn is_account_in_use(&self) -> bool {
        match self {
            Self::Rejected { message, logs } => {
                message.contains(ACCOUNT_IN_USE)
                    || logs.iter().any(|line| line.contains(ACCOUNT_IN_USE))
            }
            Self::AccountInUse { .. } => true,
            _ => false,
        }
    }

    /// Short machine-readable name, used for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "ledger_unavailable",
            Self::Rejected { .. } | Self::AccountInUse { .. } => "ledger_rejected",
            Self::NotFound(_) => "not_found",
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Caller-supplied data is malformed; nothing was sent to the ledger
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("tag is already registered at {locator}")]
    DuplicateRegistration { locator: Pubkey },

    #[error("no product registered at {locator}")]
    NotFound { locator: Pubkey },

    #[error("ledger rejected call: {message}")]
    LedgerRejected { message: String, logs: Vec<String> },

    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("account {locator} does not hold a product record: {reason}")]
    InvalidAccountData { locator: Pubkey, reason: String },
}

impl RegistryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateRegistration { .. } => "duplicate_registration",
            Self::NotFound { .. } => "not_found",
            Self::LedgerRejected { .. } => "ledger_rejected",
            Self::LedgerUnavailable(_) => "ledger_unavailable",
            Self::InvalidAccountData { .. } => "invalid_account_data",
        }
    }
}

impl From<LedgerError> for RegistryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unavailable(message) => Self::LedgerUnavailable(message),
            LedgerError::Rejected { message, logs } => Self::LedgerRejected { message, logs },
            LedgerError::AccountInUse { message } => Self::LedgerRejected {
                message,
                logs: Vec::new(),
            },
            LedgerError::NotFound(locator) => Self::NotFound { locator },
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
