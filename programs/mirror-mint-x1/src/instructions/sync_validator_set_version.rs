use anchor_lang::prelude::*;
use solana_light_client_x1::{X1ValidatorSet, ID as LIGHT_CLIENT_ID};

use crate::errors::MintError;
use crate::state::MintState;

#[derive(Accounts)]
pub struct SyncValidatorSetVersion<'info> {
    #[account(
        mut,
        seeds = [b"mint_state_v3"],
        bump = mint_state.bump,
        has_one = authority @ MintError::Unauthorized,
    )]
    pub mint_state: Account<'info, MintState>,

    #[account(owner = LIGHT_CLIENT_ID)]
    pub validator_set: Account<'info, X1ValidatorSet>,

    pub authority: Signer<'info>,
}

/// Re-pin the fee configuration to the current validator set version.
///
/// Minting halts with ValidatorSetVersionDrift after the set rotates; this
/// is the admin step that acknowledges the new set (and its size, which
/// the per-validator fee math depends on) and resumes minting.
pub fn handler(ctx: Context<SyncValidatorSetVersion>) -> Result<()> {
    let mint_state = &mut ctx.accounts.mint_state;
    let current = ctx.accounts.validator_set.version;

    msg!(
        "Re-pinning validator set version: {} -> {}",
        mint_state.validator_set_version_pin,
        current
    );

    mint_state.validator_set_version_pin = current;

    Ok(())
}
