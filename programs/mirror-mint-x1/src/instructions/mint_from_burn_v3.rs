use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};
use bridge_core::Asset;
use solana_light_client_x1::{VerifiedBurn, X1ValidatorSet, ID as LIGHT_CLIENT_ID};

use crate::errors::MintError;
use crate::state::{MintState, ProcessedBurn};

/// Mint mirror tokens from an asset-aware verified burn.
///
/// The asset-isolation barrier is enforced three times over:
/// - the attestation digest includes asset_id (checked in the light client)
/// - the VerifiedBurn PDA is scoped by asset_id (checked by the seeds here)
/// - this deployment's MintState is bound to one asset_id (checked below)
#[derive(Accounts)]
#[instruction(burn_nonce: u64, asset_id: u8)]
pub struct MintFromBurnV3<'info> {
    #[account(
        mut,
        seeds = [b"mint_state_v3"],
        bump = mint_state.bump
    )]
    pub mint_state: Account<'info, MintState>,

    /// Mirror token mint on X1
    #[account(
        mut,
        address = mint_state.mirror_mint
    )]
    pub mirror_mint: Account<'info, Mint>,

    /// Processed burn tracker. `init` is the replay barrier at this layer:
    /// a second mint for the same (asset_id, user, nonce) fails because
    /// the account already exists.
    #[account(
        init,
        payer = user,
        space = 8 + ProcessedBurn::INIT_SPACE,
        seeds = [
            b"processed_burn_v3",
            asset_id.to_le_bytes().as_ref(),
            burn_nonce.to_le_bytes().as_ref(),
            user.key().as_ref()
        ],
        bump
    )]
    pub processed_burn: Account<'info, ProcessedBurn>,

    /// User's mirror token account
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ MintError::InvalidUser,
        constraint = user_token_account.mint == mint_state.mirror_mint @ MintError::InvalidUser,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// User must be signer AND match verified_burn.user. The user pays the
    /// per-validator fees.
    #[account(mut)]
    pub user: Signer<'info>,

    /// Validator set (from the light client), read for fee distribution.
    ///
    /// SECURITY: the version pin is checked in the constraint BEFORE any
    /// minting, so fees are never distributed against a stale fee config.
    #[account(
        owner = LIGHT_CLIENT_ID,
        constraint = validator_set.version == mint_state.validator_set_version_pin
            @ MintError::ValidatorSetVersionDrift
    )]
    pub validator_set: Account<'info, X1ValidatorSet>,

    /// Verified burn created by the light client. Read-only here: the
    /// record is immutable, and replay is barred by processed_burn above.
    #[account(
        seeds = [
            b"verified_burn_v3",
            asset_id.to_le_bytes().as_ref(),
            user.key().as_ref(),
            burn_nonce.to_le_bytes().as_ref()
        ],
        bump = verified_burn.bump,
        seeds::program = LIGHT_CLIENT_ID,
        constraint = verified_burn.user == user.key() @ MintError::InvalidUser,
        constraint = verified_burn.burn_nonce == burn_nonce @ MintError::NonceMismatch,
        constraint = verified_burn.asset_id == asset_id @ MintError::AssetMismatch,
    )]
    pub verified_burn: Account<'info, VerifiedBurn>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, MintFromBurnV3<'info>>,
    burn_nonce: u64,
    asset_id: u8,
) -> Result<()> {
    // ASSET ISOLATION BARRIER: this deployment mints exactly one asset.
    // A verified burn of any other asset is refused before anything else.
    let asset = Asset::from_code(asset_id).ok_or(MintError::UnknownAsset)?;
    require!(
        ctx.accounts.mint_state.asset_id == asset_id,
        MintError::AssetNotMintable
    );

    let verified = &ctx.accounts.verified_burn;
    let amount = verified.amount;

    msg!("Minting {} from verified burn", asset.name());
    msg!("   Burn nonce: {}", burn_nonce);
    msg!("   User: {}", verified.user);
    msg!("   Amount: {}", amount);
    msg!("   Verified at: {}", verified.verified_at);

    // Record the processed burn. The init above already guaranteed this is
    // the first processing of (asset_id, user, nonce).
    let processed = &mut ctx.accounts.processed_burn;
    processed.asset_id = asset_id;
    processed.burn_nonce = burn_nonce;
    processed.user = ctx.accounts.user.key();
    processed.amount = amount;
    processed.processed_at = Clock::get()?.unix_timestamp;

    distribute_validator_fees(&ctx)?;

    // Mint exactly the verified amount under the mint_state PDA authority
    let mint_state = &ctx.accounts.mint_state;
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.mirror_mint.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: ctx.accounts.mint_state.to_account_info(),
            },
            &[&[b"mint_state_v3", &[mint_state.bump]]],
        ),
        amount,
    )?;

    msg!("✓ Minted {} tokens", amount);

    let mint_state = &mut ctx.accounts.mint_state;
    mint_state.processed_burns_count = mint_state.processed_burns_count.saturating_add(1);
    mint_state.total_minted = mint_state.total_minted.saturating_add(amount);

    emit!(MintedFromBurnV3 {
        asset_id,
        burn_nonce,
        user: ctx.accounts.user.key(),
        amount,
    });

    Ok(())
}

/// Pay `fee_per_validator` from the user to every validator in the current
/// set, in the set's declared order.
///
/// The caller supplies the payout accounts as remaining_accounts; they must
/// equal the current set in both length and order, byte-exact on pubkey.
fn distribute_validator_fees<'info>(
    ctx: &Context<'_, '_, '_, 'info, MintFromBurnV3<'info>>,
) -> Result<()> {
    let validator_set = &ctx.accounts.validator_set;
    let fee_per_validator = ctx.accounts.mint_state.fee_per_validator;

    if fee_per_validator == 0 {
        return Ok(());
    }

    require!(
        ctx.remaining_accounts.len() == validator_set.validators.len(),
        MintError::InvalidValidatorAccount
    );

    let total_fee = total_fee(fee_per_validator, validator_set.validators.len())?;

    msg!(
        "Distributing {} lamports across {} validators",
        total_fee,
        validator_set.validators.len()
    );

    for (i, record) in validator_set.validators.iter().enumerate() {
        let validator_account = ctx
            .remaining_accounts
            .get(i)
            .ok_or(MintError::MissingValidatorAccount)?;

        require!(
            validator_account.key() == record.pubkey,
            MintError::InvalidValidatorAccount
        );
        require!(
            validator_account.is_writable,
            MintError::ValidatorAccountNotWritable
        );

        let fee_transfer = anchor_lang::solana_program::system_instruction::transfer(
            ctx.accounts.user.key,
            validator_account.key,
            fee_per_validator,
        );

        anchor_lang::solana_program::program::invoke(
            &fee_transfer,
            &[
                ctx.accounts.user.to_account_info(),
                validator_account.to_account_info(),
            ],
        )?;

        msg!("✓ {} lamports to {}", fee_per_validator, record.pubkey);
    }

    Ok(())
}

/// Total fee the caller pays, checked against overflow.
fn total_fee(fee_per_validator: u64, validator_count: usize) -> Result<u64> {
    fee_per_validator
        .checked_mul(validator_count as u64)
        .ok_or_else(|| error!(MintError::Overflow))
}

/// Event emitted when mirror tokens are minted from a verified burn.
#[event]
pub struct MintedFromBurnV3 {
    pub asset_id: u8,
    pub burn_nonce: u64,
    pub user: Pubkey,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_fee() {
        assert_eq!(total_fee(10_000_000, 5).unwrap(), 50_000_000);
        assert_eq!(total_fee(0, 5).unwrap(), 0);
    }

    #[test]
    fn test_total_fee_overflow() {
        assert!(total_fee(u64::MAX, 2).is_err());
    }
}
