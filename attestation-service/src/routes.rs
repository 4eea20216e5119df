use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use bridge_core::Asset;

use crate::context::ServiceContext;
use crate::error::AttestError;
use crate::finality::enforce_finality;
use crate::observer::detect_burn;
use crate::signer::sign_burn;

pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/attest-burn", post(attest_burn))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
pub struct AttestBurnRequest {
    pub burn_nonce: u64,
    /// Base58 public key of the burner
    pub user: String,
    pub expected_amount: u64,
    /// The validator set version the client wants the signature bound to.
    /// The client is responsible for requesting the current one; a stale
    /// version simply yields a signature the verifier will reject.
    pub validator_set_version: u64,
}

#[derive(Debug, Serialize)]
pub struct AttestBurnResponse {
    pub asset_id: u8,
    pub asset_name: &'static str,
    pub burn_nonce: u64,
    pub user: String,
    pub amount: u64,
    pub validator_set_version: u64,
    pub validator_pubkey: String,
    /// Base58-encoded 64-byte Ed25519 signature
    pub signature: String,
    /// Advisory only, never part of the signed digest
    pub timestamp: u64,
}

/// The attestation pipeline: observe, check the request against what was
/// observed, gate on finality, sign.
async fn attest_burn(
    State(ctx): State<Arc<ServiceContext>>,
    Json(request): Json<AttestBurnRequest>,
) -> Result<Json<AttestBurnResponse>, AttestError> {
    let requested_user = Pubkey::from_str(&request.user)
        .map_err(|_| AttestError::InvalidRequest("user must be a base58 public key".to_string()))?;

    let detected = detect_burn(&ctx, request.burn_nonce).await?;

    if detected.user != requested_user {
        return Err(AttestError::UserMismatch {
            requested_user: requested_user.to_string(),
            detected_user: detected.user.to_string(),
        });
    }

    if detected.amount != request.expected_amount {
        return Err(AttestError::AmountMismatch {
            requested_amount: request.expected_amount,
            actual_amount: detected.amount,
        });
    }

    let current_slot = ctx
        .rpc
        .get_slot_with_commitment(CommitmentConfig::confirmed())
        .await?;
    enforce_finality(current_slot, detected.slot, ctx.finality_slots)?;

    let attestation = sign_burn(
        &ctx.keypair,
        detected.asset,
        request.burn_nonce,
        &detected.user,
        detected.amount,
        request.validator_set_version,
    );

    info!(
        asset = attestation.asset.name(),
        burn_nonce = attestation.burn_nonce,
        user = %attestation.user,
        amount = attestation.amount,
        tx = %detected.tx_signature,
        "attestation issued"
    );

    Ok(Json(AttestBurnResponse {
        asset_id: attestation.asset.code(),
        asset_name: attestation.asset.name(),
        burn_nonce: attestation.burn_nonce,
        user: attestation.user.to_string(),
        amount: attestation.amount,
        validator_set_version: attestation.validator_set_version,
        validator_pubkey: attestation.validator_pubkey.to_string(),
        signature: attestation.signature.to_string(),
        timestamp: attestation.timestamp,
    }))
}

async fn health(State(ctx): State<Arc<ServiceContext>>) -> Json<Value> {
    let supported_assets: Vec<Value> = Asset::ALL
        .iter()
        .map(|asset| {
            json!({
                "asset_id": asset.code(),
                "name": asset.name(),
                "source_mint": asset.source_mint(),
            })
        })
        .collect();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "supported_assets": supported_assets,
        "validator": ctx.keypair.pubkey().to_string(),
        "source_rpc": ctx.source_rpc_url,
    }))
}
