use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};

use crate::registry::{ProductListing, ProductRecord, Registration, Verification};

/// Serialize through `Display` (base58 for keys and signatures)
pub fn display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Missing fields are kept as `None` so they surface as invalid input
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub nfc_id: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub owner: Option<String>,
    pub after: Option<String>,
    pub limit: Option<usize>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub transaction_signature: String,
    pub slot: u64,
    pub product_account: String,
    pub nfc_id: String,
    pub product_id: String,
    pub owner: String,
}

impl From<Registration> for RegisterResponse {
    fn from(r: Registration) -> Self {
        Self {
            message: "Product registered successfully",
            transaction_signature: r.receipt.signature.to_string(),
            slot: r.receipt.slot,
            product_account: r.locator.to_string(),
            nfc_id: r.nfc_id,
            product_id: r.product_id,
            owner: r.owner.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_authentic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_account: Option<String>,
    pub nfc_id: String,
}

impl From<Verification> for VerifyResponse {
    fn from(v: Verification) -> Self {
        Self {
            is_authentic: v.is_authentic,
            product_account: v.locator.map(|l| l.to_string()),
            nfc_id: v.nfc_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub found: bool,
    pub nfc_id: String,
    pub product_account: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub count: usize,
    pub skipped: usize,
    pub products: Vec<ProductRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl From<ProductListing> for ListResponse {
    fn from(listing: ProductListing) -> Self {
        Self {
            count: listing.count(),
            skipped: listing.skipped,
            next_cursor: listing.next_cursor.map(|c| c.to_string()),
            products: listing.products,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub slot: u64,
    pub program_id: String,
    pub authority: String,
}
