use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use solana_sdk::pubkey::Pubkey;

use super::dto::{
    HealthResponse, ListParams, ListResponse, NotFoundResponse, RegisterRequest,
    RegisterResponse, VerifyResponse,
};
use super::errors::{json_error, registry_error_to_response};
use crate::error::RegistryError;
use crate::ledger::Ledger;
use crate::registry::{ListQuery, ProductRegistry};

type Registry<L> = State<Arc<ProductRegistry<L>>>;

/// POST /api/products
pub async fn register_product<L: Ledger + 'static>(
    State(registry): Registry<L>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
        }
    };

    let nfc_id = body.nfc_id.unwrap_or_default();
    let product_id = body.product_id.unwrap_or_default();

    match registry.register(&nfc_id, &product_id).await {
        Ok(registration) => Json(RegisterResponse::from(registration)).into_response(),
        Err(err) => registry_error_to_response(err),
    }
}

/// GET /api/products/:nfc_id/verify
pub async fn verify_product<L: Ledger + 'static>(
    State(registry): Registry<L>,
    Path(nfc_id): Path<String>,
) -> Json<VerifyResponse> {
    Json(registry.verify(&nfc_id).await.into())
}

/// GET /api/products/:nfc_id
pub async fn fetch_product<L: Ledger + 'static>(
    State(registry): Registry<L>,
    Path(nfc_id): Path<String>,
) -> Response {
    match registry.fetch(&nfc_id).await {
        Ok(record) => Json(record).into_response(),
        Err(RegistryError::NotFound { locator }) => (
            StatusCode::NOT_FOUND,
            Json(NotFoundResponse {
                found: false,
                nfc_id,
                product_account: locator.to_string(),
            }),
        )
            .into_response(),
        Err(err) => registry_error_to_response(err),
    }
}

/// GET /api/products
pub async fn list_products<L: Ledger + 'static>(
    State(registry): Registry<L>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
        }
    };

    let query = match list_query(params) {
        Ok(query) => query,
        Err(err) => return registry_error_to_response(err),
    };

    match registry.list(&query).await {
        Ok(listing) => Json(ListResponse::from(listing)).into_response(),
        Err(err) => registry_error_to_response(err),
    }
}

/// GET /api/health
pub async fn health<L: Ledger + 'static>(State(registry): Registry<L>) -> Response {
    match registry.chain_height().await {
        Ok(slot) => Json(HealthResponse {
            status: "ok",
            slot,
            program_id: registry.program_id().to_string(),
            authority: registry.authority().to_string(),
        })
        .into_response(),
        Err(err) => registry_error_to_response(err),
    }
}

fn list_query(params: ListParams) -> Result<ListQuery, RegistryError> {
    Ok(ListQuery {
        owner: params.owner.as_deref().map(parse_key).transpose()?,
        after: params.after.as_deref().map(parse_key).transpose()?,
        limit: params.limit,
    })
}

fn parse_key(input: &str) -> Result<Pubkey, RegistryError> {
    input
        .parse()
        .map_err(|_| RegistryError::InvalidInput(format!("'{input}' is not a valid public key")))
}
