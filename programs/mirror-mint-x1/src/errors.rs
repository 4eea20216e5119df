use anchor_lang::prelude::*;

#[error_code]
pub enum MintError {
    #[msg("Asset not mintable by this deployment - mint state is bound to a different asset")]
    AssetNotMintable,

    #[msg("Unknown asset id")]
    UnknownAsset,

    #[msg("Asset mismatch between verified burn and requested asset_id")]
    AssetMismatch,

    #[msg("Burn already processed (replay barrier)")]
    AlreadyProcessed,

    #[msg("Invalid user - verified burn belongs to a different user")]
    InvalidUser,

    #[msg("Nonce mismatch between verified burn and request")]
    NonceMismatch,

    #[msg("Validator set version drift - mint config pinned to an older version")]
    ValidatorSetVersionDrift,

    #[msg("Missing validator account in remaining_accounts")]
    MissingValidatorAccount,

    #[msg("Validator accounts must match the current set in length and order")]
    InvalidValidatorAccount,

    #[msg("Validator account must be writable to receive fees")]
    ValidatorAccountNotWritable,

    #[msg("Arithmetic overflow in fee calculation")]
    Overflow,

    #[msg("Invalid mint decimals - must be 6")]
    InvalidMintDecimals,

    #[msg("Unauthorized: caller is not the authority")]
    Unauthorized,
}
