use anchor_lang::prelude::*;

use crate::errors::LightClientError;

/// Registry of X1 validators who attest to Solana burns.
///
/// Singleton PDA, created once at genesis and mutated only by the
/// authority. Every mutation bumps `version`, which is bound into every
/// attestation digest: the moment the set rotates, all in-flight
/// attestations become unverifiable.
#[account]
#[derive(InitSpace)]
pub struct X1ValidatorSet {
    /// Version number (monotonically increasing, starts at 1)
    /// Used for replay protection - old signatures become invalid
    pub version: u64,

    /// Authority allowed to rotate the set
    pub authority: Pubkey,

    /// Trusted validators, in canonical order. The order is load-bearing:
    /// fee distribution in the mint program iterates it as declared here.
    /// Capacity must stay equal to MAX_VALIDATORS.
    #[max_len(10)]
    pub validators: Vec<ValidatorRecord>,

    /// How many distinct signatures are needed (e.g. 3 of 5)
    pub threshold: u8,

    pub bump: u8,
}

impl X1ValidatorSet {
    /// Upper bound keeps attestation transactions inside the 1232-byte
    /// transaction size limit.
    pub const MAX_VALIDATORS: usize = 10;

    /// Whether `pubkey` belongs to the current set.
    pub fn contains(&self, pubkey: &Pubkey) -> bool {
        self.validators.iter().any(|v| v.pubkey == *pubkey)
    }

    /// Validate a candidate (validators, threshold) configuration.
    ///
    /// Shared by genesis and update: the set must be non-empty and within
    /// bounds, the threshold must satisfy 1 <= threshold <= len, and no
    /// public key may appear twice.
    pub fn validate_config(validators: &[ValidatorRecord], threshold: u8) -> Result<()> {
        require!(!validators.is_empty(), LightClientError::EmptyValidatorSet);
        require!(
            validators.len() <= Self::MAX_VALIDATORS,
            LightClientError::TooManyValidators
        );
        require!(threshold > 0, LightClientError::InvalidThreshold);
        require!(
            (threshold as usize) <= validators.len(),
            LightClientError::InvalidThreshold
        );

        for (i, record) in validators.iter().enumerate() {
            for other in &validators[i + 1..] {
                require!(
                    record.pubkey != other.pubkey,
                    LightClientError::DuplicateValidatorRecord
                );
            }
        }

        Ok(())
    }
}

/// One validator entry.
///
/// Identity is the signing pubkey alone; the label and API endpoint are
/// operator conveniences surfaced to bridge clients looking for an
/// attestation service to query.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, InitSpace)]
pub struct ValidatorRecord {
    /// X1 validator's signing public key (Ed25519)
    pub pubkey: Pubkey,

    /// Optional operator label
    #[max_len(32)]
    pub name: Option<String>,

    /// Optional API endpoint where users can request attestations
    #[max_len(128)]
    pub attestation_api: Option<String>,
}

impl PartialEq for ValidatorRecord {
    /// Equality on the public key alone; metadata never affects identity.
    fn eq(&self, other: &Self) -> bool {
        self.pubkey == other.pubkey
    }
}

impl Eq for ValidatorRecord {}

/// User submits this to prove a burn.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct BurnAttestationPayload {
    /// User the burn belongs to (must match the submitting signer)
    pub user: Pubkey,

    /// Amount burned on Solana
    pub amount: u64,

    /// Validator set version these attestations were signed under.
    /// Must equal the current version in X1ValidatorSet.
    pub validator_set_version: u64,

    /// Signatures from X1 validators (at least threshold distinct ones)
    pub attestations: Vec<ValidatorAttestation>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct ValidatorAttestation {
    /// Which X1 validator signed this
    pub validator_pubkey: Pubkey,

    /// Their Ed25519 signature over the attestation digest
    pub signature: [u8; 64],

    /// When they verified it (unix timestamp). Advisory only: this field
    /// is never part of the signed digest.
    pub timestamp: i64,
}

/// Verification result, one per (asset_id, user, burn_nonce).
///
/// Created exactly once by submit_burn_attestation_v3 and never mutated
/// afterwards: existence IS the proof. The PDA seeds include asset_id, so
/// a verified DGN burn can never stand in for a XENCAT one. Replay at the
/// mint layer is barred separately by the mint program's ProcessedBurn PDA.
#[account]
#[derive(InitSpace)]
pub struct VerifiedBurn {
    /// Which asset was burned
    pub asset_id: u8,

    /// Burn nonce from Solana
    pub burn_nonce: u64,

    /// User who burned tokens (verified in the digest)
    pub user: Pubkey,

    /// Amount burned (verified in the digest)
    pub amount: u64,

    /// When verification occurred
    pub verified_at: i64,

    /// Validator set version the attestations were verified under
    pub validator_set_version: u64,

    /// PDA bump
    pub bump: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pubkey: Pubkey) -> ValidatorRecord {
        ValidatorRecord {
            pubkey,
            name: None,
            attestation_api: None,
        }
    }

    #[test]
    fn test_record_equality_ignores_metadata() {
        let pubkey = Pubkey::new_unique();
        let plain = record(pubkey);
        let labelled = ValidatorRecord {
            pubkey,
            name: Some("validator-one".to_string()),
            attestation_api: Some("https://v1.example.com".to_string()),
        };
        assert_eq!(plain, labelled);
    }

    #[test]
    fn test_validate_config_accepts_boundary_thresholds() {
        let validators: Vec<_> = (0..5).map(|_| record(Pubkey::new_unique())).collect();
        // threshold = 1 and threshold = len both operate
        assert!(X1ValidatorSet::validate_config(&validators, 1).is_ok());
        assert!(X1ValidatorSet::validate_config(&validators, 5).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_out_of_range_threshold() {
        let validators: Vec<_> = (0..5).map(|_| record(Pubkey::new_unique())).collect();
        assert!(X1ValidatorSet::validate_config(&validators, 0).is_err());
        assert!(X1ValidatorSet::validate_config(&validators, 6).is_err());
    }

    #[test]
    fn test_validate_config_rejects_duplicates() {
        let dup = Pubkey::new_unique();
        let validators = vec![record(dup), record(Pubkey::new_unique()), record(dup)];
        assert!(X1ValidatorSet::validate_config(&validators, 2).is_err());
    }

    #[test]
    fn test_validate_config_rejects_empty_set() {
        assert!(X1ValidatorSet::validate_config(&[], 1).is_err());
    }

    #[test]
    fn test_contains_checks_pubkey_only() {
        let member = Pubkey::new_unique();
        let set = X1ValidatorSet {
            version: 1,
            authority: Pubkey::new_unique(),
            validators: vec![record(member)],
            threshold: 1,
            bump: 255,
        };
        assert!(set.contains(&member));
        assert!(!set.contains(&Pubkey::new_unique()));
    }
}
