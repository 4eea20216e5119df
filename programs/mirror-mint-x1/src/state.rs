use anchor_lang::prelude::*;

/// Mint program state.
///
/// One deployment of this program serves exactly one mirror asset; the
/// binding happens here at initialization and is checked on every mint.
/// A DGN VerifiedBurn presented to the XENCAT deployment dies on the
/// `asset_id` gate before any token CPI runs.
#[account]
#[derive(InitSpace)]
pub struct MintState {
    /// The one asset this deployment is allowed to mint
    pub asset_id: u8,

    /// Admin for configuration changes (repin, metadata)
    pub authority: Pubkey,

    /// The mirror token mint on X1
    pub mirror_mint: Pubkey,

    /// Fee paid by the caller to each validator, per mint (lamports)
    pub fee_per_validator: u64,

    /// Light client program id owning the validator set and VerifiedBurns
    pub light_client_program: Pubkey,

    /// Validator set version the fee math was configured against. Minting
    /// halts with ValidatorSetVersionDrift when the live set moves past
    /// this pin; the authority re-pins after reviewing the fee config.
    pub validator_set_version_pin: u64,

    pub processed_burns_count: u64,
    pub total_minted: u64,
    pub bump: u8,
}

/// Processed burn tracker, one per (asset_id, user, burn_nonce).
///
/// Created exactly once when a mint succeeds and never touched again; the
/// PDA init failing on an existing account is the replay barrier at the
/// mint layer, independent of the light client's VerifiedBurn barrier.
///
/// PDA seeds include asset_id ("processed_burn_v3", asset_id, nonce, user)
/// so different assets can carry the same nonce without collision.
#[account]
#[derive(InitSpace)]
pub struct ProcessedBurn {
    pub asset_id: u8,
    pub burn_nonce: u64,
    pub user: Pubkey,
    pub amount: u64,
    pub processed_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_state_space() {
        // asset_id + authority + mirror_mint + fee + light_client_program
        // + version pin + counters + bump
        let expected = 1 + 32 + 32 + 8 + 32 + 8 + 8 + 8 + 1;
        assert_eq!(MintState::INIT_SPACE, expected);
    }

    #[test]
    fn test_processed_burn_space() {
        // asset_id + nonce + user + amount + processed_at
        let expected = 1 + 8 + 32 + 8 + 8;
        assert_eq!(ProcessedBurn::INIT_SPACE, expected);
    }
}
