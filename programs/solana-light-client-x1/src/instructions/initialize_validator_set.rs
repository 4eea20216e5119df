use anchor_lang::prelude::*;

use crate::state::{ValidatorRecord, X1ValidatorSet};

#[derive(Accounts)]
pub struct InitializeValidatorSet<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + X1ValidatorSet::INIT_SPACE,
        seeds = [b"x1_validator_set_v2"],
        bump
    )]
    pub validator_set: Account<'info, X1ValidatorSet>,

    pub system_program: Program<'info, System>,
}

/// Genesis of the validator set. Runs once: the PDA init fails on any
/// second attempt. The payer becomes the update authority.
pub fn handler(
    ctx: Context<InitializeValidatorSet>,
    validators: Vec<ValidatorRecord>,
    threshold: u8,
) -> Result<()> {
    X1ValidatorSet::validate_config(&validators, threshold)?;

    let validator_set = &mut ctx.accounts.validator_set;
    validator_set.version = 1; // Start at version 1
    validator_set.authority = ctx.accounts.payer.key();
    validator_set.validators = validators;
    validator_set.threshold = threshold;
    validator_set.bump = ctx.bumps.validator_set;

    msg!("✅ Validator set initialized");
    msg!("   Version: {}", validator_set.version);
    msg!("   Validators: {}", validator_set.validators.len());
    msg!("   Threshold: {}", threshold);

    Ok(())
}
