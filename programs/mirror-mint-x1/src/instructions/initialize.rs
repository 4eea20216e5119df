use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use bridge_core::Asset;

use crate::errors::MintError;
use crate::state::MintState;

#[derive(Accounts)]
pub struct InitializeMintState<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + MintState::INIT_SPACE,
        seeds = [b"mint_state_v3"],
        bump
    )]
    pub mint_state: Account<'info, MintState>,

    /// Mirror token mint (must already exist; this deployment's mint_state
    /// PDA is expected to hold its mint authority)
    #[account(
        constraint = mirror_mint.decimals == 6 @ MintError::InvalidMintDecimals,
    )]
    pub mirror_mint: Account<'info, Mint>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Bind this deployment to its asset. Runs once per deployment; the asset
/// binding is permanent.
pub fn handler(
    ctx: Context<InitializeMintState>,
    asset_id: u8,
    fee_per_validator: u64,
    light_client_program: Pubkey,
) -> Result<()> {
    let asset = Asset::from_code(asset_id).ok_or(MintError::UnknownAsset)?;

    let state = &mut ctx.accounts.mint_state;
    state.asset_id = asset_id;
    state.authority = ctx.accounts.authority.key();
    state.mirror_mint = ctx.accounts.mirror_mint.key();
    state.fee_per_validator = fee_per_validator;
    state.light_client_program = light_client_program;
    state.validator_set_version_pin = 1; // Genesis version
    state.processed_burns_count = 0;
    state.total_minted = 0;
    state.bump = ctx.bumps.mint_state;

    msg!("Mint program initialized for {}", asset.name());
    msg!("Authority: {}", state.authority);
    msg!("Mirror mint: {}", state.mirror_mint);
    msg!("Light client program: {}", state.light_client_program);
    msg!("Fee per validator: {} lamports", state.fee_per_validator);

    Ok(())
}
