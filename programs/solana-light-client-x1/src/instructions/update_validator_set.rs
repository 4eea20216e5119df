use anchor_lang::prelude::*;

use crate::errors::LightClientError;
use crate::state::{ValidatorRecord, X1ValidatorSet};

#[derive(Accounts)]
pub struct UpdateValidatorSet<'info> {
    #[account(
        mut,
        seeds = [b"x1_validator_set_v2"],
        bump = validator_set.bump,
        has_one = authority @ LightClientError::Unauthorized
    )]
    pub validator_set: Account<'info, X1ValidatorSet>,

    pub authority: Signer<'info>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct UpdateValidatorSetParams {
    /// New list of validators
    pub new_validators: Vec<ValidatorRecord>,

    /// New threshold (how many signatures required)
    pub new_threshold: u8,
}

/// Rotate the validator set.
///
/// SECURITY CRITICAL: the version bump is what invalidates every
/// attestation signed under the old set. There is no grace window: an
/// in-flight attestation bundle fails submission with VersionMismatch and
/// the user re-requests signatures under the new version.
pub fn handler(ctx: Context<UpdateValidatorSet>, params: UpdateValidatorSetParams) -> Result<()> {
    let validator_set = &mut ctx.accounts.validator_set;

    msg!("🔄 Updating validator set");
    msg!("   Current version: {}", validator_set.version);
    msg!("   Current validators: {}", validator_set.validators.len());
    msg!("   New validators: {}", params.new_validators.len());
    msg!("   New threshold: {}", params.new_threshold);

    X1ValidatorSet::validate_config(&params.new_validators, params.new_threshold)?;

    // Increment version (MUST be monotonically increasing)
    let new_version = validator_set
        .version
        .checked_add(1)
        .ok_or(LightClientError::ArithmeticOverflow)?;

    validator_set.validators = params.new_validators;
    validator_set.threshold = params.new_threshold;
    validator_set.version = new_version;

    msg!("✅ Validator set updated, new version: {}", new_version);

    Ok(())
}
