use anchor_lang::prelude::*;

pub mod ed25519_utils;
pub mod errors;
pub mod instructions;
pub mod state;

use instructions::*;
pub use errors::LightClientError;
pub use state::{
    BurnAttestationPayload, ValidatorAttestation, ValidatorRecord, VerifiedBurn, X1ValidatorSet,
};

// Re-exported so downstream programs and services share the exact digest
// and asset registry this verifier checks against.
pub use bridge_core::{Asset, DOMAIN_SEPARATOR};

declare_id!("BXBZtvFfCtCapQgqFTxGQ9hgJTQZUoHFzBXD2V3ys5C5");

#[program]
pub mod solana_light_client_x1 {
    use super::*;

    /// Initialize X1 validator set (run once)
    pub fn initialize_validator_set(
        ctx: Context<InitializeValidatorSet>,
        validators: Vec<ValidatorRecord>,
        threshold: u8,
    ) -> Result<()> {
        instructions::initialize_validator_set::handler(ctx, validators, threshold)
    }

    /// Rotate the validator set (authority only); bumps the version and
    /// thereby invalidates every outstanding attestation
    pub fn update_validator_set(
        ctx: Context<UpdateValidatorSet>,
        params: UpdateValidatorSetParams,
    ) -> Result<()> {
        instructions::update_validator_set::handler(ctx, params)
    }

    /// Verify an attestation bundle for a Solana burn and record the
    /// result as an immutable VerifiedBurn PDA
    pub fn submit_burn_attestation_v3(
        ctx: Context<SubmitBurnAttestationV3>,
        asset_id: u8,
        burn_nonce: u64,
        payload: BurnAttestationPayload,
    ) -> Result<()> {
        instructions::submit_burn_attestation_v3::handler(ctx, asset_id, burn_nonce, payload)
    }
}
