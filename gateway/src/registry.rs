//! Product registry operations
//!
//! Turns register / verify / fetch / list requests into address derivation
//! plus ledger calls, and ledger faults into registry outcomes. Holds no
//! state of its own: every answer comes from the ledger.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::codec::{decode_bool_return, ProductAccount, ProgramCall, ProgramInterface};
use crate::derive::{derive_product_address, validate_nfc_id, validate_product_id};
use crate::error::{RegistryError, Result};
use crate::ledger::{Ledger, ProgramFilter, TransactionReceipt};

/// A product record as stored on-chain, with its address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "productAccount", serialize_with = "crate::api::dto::display")]
    pub locator: Pubkey,
    #[serde(serialize_with = "crate::api::dto::display")]
    pub owner: Pubkey,
    pub nfc_id: String,
    pub product_id: String,
    /// Unix timestamp of registration
    pub created_at: i64,
}

impl ProductRecord {
    fn from_account(locator: Pubkey, account: ProductAccount) -> Self {
        Self {
            locator,
            owner: account.owner,
            nfc_id: account.nfc_id,
            product_id: account.product_id,
            created_at: account.created_at,
        }
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub locator: Pubkey,
    pub receipt: TransactionReceipt,
    pub owner: Pubkey,
    pub nfc_id: String,
    pub product_id: String,
}

/// Outcome of an authenticity check
///
/// `is_authentic` is false both when the account is missing and when the
/// program says no. `fault` keeps the underlying reason for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub is_authentic: bool,
    pub locator: Option<Pubkey>,
    pub nfc_id: String,
    pub fault: Option<String>,
}

/// Narrowing and paging for [`ProductRegistry::list`]
///
/// The default lists every product in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub owner: Option<Pubkey>,
    /// Return only records whose address sorts after this one
    pub after: Option<Pubkey>,
    pub limit: Option<usize>,
}

impl ListQuery {
    fn is_paged(&self) -> bool {
        self.after.is_some() || self.limit.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub products: Vec<ProductRecord>,
    /// Program accounts that did not decode as product records
    pub skipped: usize,
    /// Pass as `after` to get the next page
    pub next_cursor: Option<Pubkey>,
}

impl ProductListing {
    pub fn count(&self) -> usize {
        self.products.len()
    }
}

pub struct ProductRegistry<L> {
    ledger: L,
    interface: ProgramInterface,
}

impl<L: Ledger> ProductRegistry<L> {
    pub fn new(ledger: L, interface: ProgramInterface) -> Self {
        Self { ledger, interface }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The identity every product is registered and verified under
    pub fn authority(&self) -> Pubkey {
        self.ledger.authority()
    }

    pub fn program_id(&self) -> Pubkey {
        self.ledger.program_id()
    }

    /// Address of the product account for `nfc_id` under this authority
    pub fn locate(&self, nfc_id: &str) -> Result<Pubkey> {
        derive_product_address(&self.ledger.program_id(), &self.ledger.authority(), nfc_id)
    }

    /// Create the product account for `nfc_id`
    ///
    /// At most once per tag: a second attempt fails with
    /// `DuplicateRegistration` and leaves the first record untouched.
    #[tracing::instrument(skip(self), fields(locator))]
    pub async fn register(&self, nfc_id: &str, product_id: &str) -> Result<Registration> {
        validate_nfc_id(nfc_id)?;
        validate_product_id(product_id)?;

        let locator = self.locate(nfc_id)?;
        tracing::Span::current().record("locator", tracing::field::display(&locator));

        let call = ProgramCall::Initialize {
            nfc_id: nfc_id.to_string(),
            product_id: product_id.to_string(),
        };

        let receipt = match self.ledger.submit(&locator, call).await {
            Ok(receipt) => receipt,
            Err(err) if err.is_account_in_use() => {
                tracing::info!("tag already registered");
                return Err(RegistryError::DuplicateRegistration { locator });
            }
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                return Err(err.into());
            }
        };

        tracing::info!(signature = %receipt.signature, slot = receipt.slot, "product registered");

        Ok(Registration {
            locator,
            receipt,
            owner: self.ledger.authority(),
            nfc_id: nfc_id.to_string(),
            product_id: product_id.to_string(),
        })
    }

    /// Ask the program whether `nfc_id` is a registered product
    ///
    /// Never fails: any fault, a missing account included, reads as
    /// "not authentic".
    #[tracing::instrument(skip(self))]
    pub async fn verify(&self, nfc_id: &str) -> Verification {
        let locator = match self.locate(nfc_id) {
            Ok(locator) => locator,
            Err(err) => {
                tracing::debug!(error = %err, "verification input rejected");
                return Verification {
                    is_authentic: false,
                    locator: None,
                    nfc_id: nfc_id.to_string(),
                    fault: Some(err.to_string()),
                };
            }
        };

        let call = ProgramCall::VerifyProduct {
            nfc_id: nfc_id.to_string(),
        };

        let outcome = self
            .ledger
            .call(&locator, call)
            .await
            .map_err(|err| format!("{}: {err}", err.kind()))
            .and_then(|data| decode_bool_return(&data).map_err(|e| e.to_string()));

        let (is_authentic, fault) = match outcome {
            Ok(authentic) => (authentic, None),
            Err(fault) => {
                tracing::warn!(%locator, %fault, "verification coerced to not authentic");
                (false, Some(fault))
            }
        };

        Verification {
            is_authentic,
            locator: Some(locator),
            nfc_id: nfc_id.to_string(),
            fault,
        }
    }

    /// Read back the product registered for `nfc_id`
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, nfc_id: &str) -> Result<ProductRecord> {
        let locator = self.locate(nfc_id)?;
        let state = self.ledger.read(&locator).await?;

        let account = ProductAccount::decode(&state.data, &self.interface).map_err(|e| {
            RegistryError::InvalidAccountData {
                locator,
                reason: e.to_string(),
            }
        })?;

        Ok(ProductRecord::from_account(locator, account))
    }

    /// Enumerate registered products
    ///
    /// A ledger fault anywhere aborts the whole listing. Accounts that do
    /// not decode are skipped and counted.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<ProductListing> {
        if query.limit == Some(0) {
            return Err(RegistryError::InvalidInput("limit must be at least 1".into()));
        }

        let filter = ProgramFilter {
            discriminator: Some(self.interface.product_account),
            owner: query.owner,
        };
        let accounts = self.ledger.list_all(&filter).await?;

        let mut products = Vec::with_capacity(accounts.len());
        let mut skipped = 0;
        for (locator, state) in accounts {
            match ProductAccount::decode(&state.data, &self.interface) {
                Ok(account) => products.push(ProductRecord::from_account(locator, account)),
                Err(err) => {
                    tracing::warn!(%locator, error = %err, "skipping undecodable account");
                    skipped += 1;
                }
            }
        }

        let mut next_cursor = None;
        if query.is_paged() {
            products.sort_by(|a, b| a.locator.to_bytes().cmp(&b.locator.to_bytes()));
            if let Some(after) = query.after {
                products.retain(|p| p.locator.to_bytes() > after.to_bytes());
            }
            if let Some(limit) = query.limit {
                if products.len() > limit {
                    products.truncate(limit);
                    next_cursor = products.last().map(|p| p.locator);
                }
            }
        }

        tracing::debug!(count = products.len(), skipped, "listed products");

        Ok(ProductListing {
            products,
            skipped,
            next_cursor,
        })
    }

    /// Current slot at the gateway's commitment level
    pub async fn chain_height(&self) -> Result<u64> {
        Ok(self.ledger.slot().await?)
    }
}
