use anchor_lang::prelude::*;

pub mod errors;
pub mod instructions;
pub mod state;

use instructions::*;
pub use errors::MintError;
pub use state::{MintState, ProcessedBurn};

declare_id!("8kmoPKtLAjjzQRN5i4emUsmWeu3LM5yPWFrsqZVyekhk");

#[program]
pub mod mirror_mint_x1 {
    use super::*;

    /// Bind this deployment to one bridged asset (run once per deployment)
    pub fn initialize_mint_state(
        ctx: Context<InitializeMintState>,
        asset_id: u8,
        fee_per_validator: u64,
        light_client_program: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, asset_id, fee_per_validator, light_client_program)
    }

    /// Mint mirror tokens from an asset-aware verified burn.
    ///
    /// Requires the current validator payout accounts as
    /// remaining_accounts, in the set's declared order.
    pub fn mint_from_burn_v3<'info>(
        ctx: Context<'_, '_, '_, 'info, MintFromBurnV3<'info>>,
        burn_nonce: u64,
        asset_id: u8,
    ) -> Result<()> {
        instructions::mint_from_burn_v3::handler(ctx, burn_nonce, asset_id)
    }

    /// Re-pin the fee config to the current validator set version
    /// (authority only); clears ValidatorSetVersionDrift after a rotation
    pub fn sync_validator_set_version(ctx: Context<SyncValidatorSetVersion>) -> Result<()> {
        instructions::sync_validator_set_version::handler(ctx)
    }

    /// Create token metadata using the MintState PDA authority
    pub fn create_metadata(
        ctx: Context<CreateMetadata>,
        name: String,
        symbol: String,
        uri: String,
    ) -> Result<()> {
        instructions::create_metadata::handler(ctx, name, symbol, uri)
    }
}
