use anchor_lang::prelude::*;

#[error_code]
pub enum LightClientError {
    #[msg("Validator set version mismatch - attestations are for wrong version")]
    VersionMismatch,

    #[msg("Unknown validator - not in current validator set")]
    UnknownValidator,

    #[msg("Duplicate validator in attestation bundle")]
    DuplicateValidator,

    #[msg("Invalid signature - Ed25519 verification failed")]
    InvalidSignature,

    #[msg("Not enough distinct attestations to meet threshold")]
    InsufficientAttestations,

    #[msg("Unknown asset id")]
    UnknownAsset,

    #[msg("Malformed attestation payload - fields don't match the submission")]
    MalformedMessage,

    #[msg("Burn already verified (replay barrier)")]
    AlreadyVerified,

    #[msg("Invalid threshold - must be > 0 and <= validator count")]
    InvalidThreshold,

    #[msg("Duplicate public key in validator records")]
    DuplicateValidatorRecord,

    #[msg("Validator set must not be empty")]
    EmptyValidatorSet,

    #[msg("Too many validators for one set")]
    TooManyValidators,

    #[msg("Unauthorized - signer is not the validator set authority")]
    Unauthorized,

    #[msg("Invalid Ed25519 instruction format or data")]
    InvalidEd25519Instruction,

    #[msg("Invalid message size - expected the 32-byte attestation digest")]
    InvalidMessageSize,

    #[msg("Arithmetic overflow in calculation")]
    ArithmeticOverflow,
}
