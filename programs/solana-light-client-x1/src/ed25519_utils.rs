use anchor_lang::prelude::*;
use anchor_lang::solana_program::ed25519_program;
use anchor_lang::solana_program::sysvar::instructions::{
    load_instruction_at_checked, ID as IX_SYSVAR_ID,
};

use crate::errors::LightClientError;
use crate::state::ValidatorAttestation;

pub use anchor_lang::solana_program::sysvar::instructions::ID as INSTRUCTIONS_SYSVAR_ID;

/// One (pubkey, signature, message) entry recovered from an Ed25519Program
/// instruction. The precompile has already verified the signature by the
/// time our instruction runs; introspection only has to prove that what it
/// verified is what the user claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Entry {
    pub pubkey: Pubkey,
    pub signature: [u8; 64],
    pub message: [u8; 32],
}

/// Extract validator data from Ed25519 instruction
///
/// Ed25519 instruction data format:
/// [0-1]:   num_signatures (u16, little-endian)
/// [2-3]:   signature_offset (u16, little-endian)
/// [4-5]:   signature_instruction_index (u16, little-endian)
/// [6-7]:   public_key_offset (u16, little-endian)
/// [8-9]:   public_key_instruction_index (u16, little-endian)
/// [10-11]: message_data_offset (u16, little-endian)
/// [12-13]: message_data_size (u16, little-endian)
/// [14-15]: message_instruction_index (u16, little-endian)
/// [16...]: data (signatures, public keys, message)
pub fn extract_ed25519_data(ix_data: &[u8]) -> Result<Ed25519Entry> {
    require!(
        ix_data.len() >= 16,
        LightClientError::InvalidEd25519Instruction
    );

    // Read offsets (little-endian u16)
    let sig_offset = u16::from_le_bytes([ix_data[2], ix_data[3]]) as usize;
    let pubkey_offset = u16::from_le_bytes([ix_data[6], ix_data[7]]) as usize;
    let msg_offset = u16::from_le_bytes([ix_data[10], ix_data[11]]) as usize;
    let msg_size = u16::from_le_bytes([ix_data[12], ix_data[13]]) as usize;

    // Validate we have enough data
    require!(
        ix_data.len() >= sig_offset + 64,
        LightClientError::InvalidEd25519Instruction
    );
    require!(
        ix_data.len() >= pubkey_offset + 32,
        LightClientError::InvalidEd25519Instruction
    );
    require!(
        ix_data.len() >= msg_offset + msg_size,
        LightClientError::InvalidEd25519Instruction
    );

    // Extract signature (64 bytes)
    let mut signature = [0u8; 64];
    signature.copy_from_slice(&ix_data[sig_offset..sig_offset + 64]);

    // Extract public key (32 bytes)
    let mut pubkey_bytes = [0u8; 32];
    pubkey_bytes.copy_from_slice(&ix_data[pubkey_offset..pubkey_offset + 32]);
    let pubkey = Pubkey::new_from_array(pubkey_bytes);

    // The signed message must be exactly the 32-byte attestation digest
    require!(msg_size == 32, LightClientError::InvalidMessageSize);
    let mut message = [0u8; 32];
    message.copy_from_slice(&ix_data[msg_offset..msg_offset + 32]);

    Ok(Ed25519Entry {
        pubkey,
        signature,
        message,
    })
}

/// Load and parse the Ed25519Program instruction at `ix_index`.
pub fn load_ed25519_instruction(
    ix_index: usize,
    instructions_sysvar: &AccountInfo,
) -> Result<Ed25519Entry> {
    let ed25519_ix = load_instruction_at_checked(ix_index, instructions_sysvar)?;

    require!(
        ed25519_ix.program_id == ed25519_program::ID,
        LightClientError::InvalidEd25519Instruction
    );

    extract_ed25519_data(&ed25519_ix.data)
}

/// Check that a precompile-verified entry is the one the user claims.
///
/// The attestation and the Ed25519 instruction must agree byte-for-byte on
/// pubkey and signature, and the precompile must have verified exactly the
/// recomputed attestation digest. Any of the three differing means the
/// precompile verified something other than this attestation.
pub fn entry_matches_attestation(
    entry: &Ed25519Entry,
    attestation: &ValidatorAttestation,
    digest: &[u8; 32],
) -> bool {
    entry.pubkey == attestation.validator_pubkey
        && entry.signature == attestation.signature
        && entry.message == *digest
}

/// Sanity check on the instructions sysvar account the caller passed in.
pub fn check_instructions_sysvar(account: &AccountInfo) -> Result<()> {
    require!(
        *account.key == IX_SYSVAR_ID,
        LightClientError::InvalidEd25519Instruction
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a single-signature Ed25519Program instruction data buffer the
    /// way the web3 helpers lay it out: header, then signature, pubkey and
    /// message packed back to back.
    fn build_ix_data(pubkey: &[u8; 32], signature: &[u8; 64], message: &[u8]) -> Vec<u8> {
        let sig_offset = 16u16;
        let pubkey_offset = sig_offset + 64;
        let msg_offset = pubkey_offset + 32;

        let mut data = Vec::new();
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&sig_offset.to_le_bytes());
        data.extend_from_slice(&u16::MAX.to_le_bytes());
        data.extend_from_slice(&pubkey_offset.to_le_bytes());
        data.extend_from_slice(&u16::MAX.to_le_bytes());
        data.extend_from_slice(&msg_offset.to_le_bytes());
        data.extend_from_slice(&(message.len() as u16).to_le_bytes());
        data.extend_from_slice(&u16::MAX.to_le_bytes());
        data.extend_from_slice(signature);
        data.extend_from_slice(pubkey);
        data.extend_from_slice(message);
        data
    }

    #[test]
    fn test_extract_round_trips() {
        let pubkey = [3u8; 32];
        let signature = [9u8; 64];
        let message = [0xAB; 32];

        let data = build_ix_data(&pubkey, &signature, &message);
        let entry = extract_ed25519_data(&data).unwrap();

        assert_eq!(entry.pubkey, Pubkey::new_from_array(pubkey));
        assert_eq!(entry.signature, signature);
        assert_eq!(entry.message, message);
    }

    #[test]
    fn test_extract_rejects_short_data() {
        assert!(extract_ed25519_data(&[0u8; 15]).is_err());
    }

    #[test]
    fn test_extract_rejects_wrong_message_size() {
        let data = build_ix_data(&[3u8; 32], &[9u8; 64], &[0xAB; 16]);
        assert!(extract_ed25519_data(&data).is_err());
    }

    #[test]
    fn test_extract_rejects_truncated_payload() {
        let mut data = build_ix_data(&[3u8; 32], &[9u8; 64], &[0xAB; 32]);
        data.truncate(data.len() - 8);
        assert!(extract_ed25519_data(&data).is_err());
    }

    #[test]
    fn test_entry_matching() {
        let digest = [0xCD; 32];
        let attestation = ValidatorAttestation {
            validator_pubkey: Pubkey::new_from_array([3u8; 32]),
            signature: [9u8; 64],
            timestamp: 0,
        };
        let entry = Ed25519Entry {
            pubkey: attestation.validator_pubkey,
            signature: attestation.signature,
            message: digest,
        };
        assert!(entry_matches_attestation(&entry, &attestation, &digest));

        let mut wrong_sig = entry.clone();
        wrong_sig.signature[0] ^= 0x01;
        assert!(!entry_matches_attestation(&wrong_sig, &attestation, &digest));

        let mut wrong_msg = entry.clone();
        wrong_msg.message[0] ^= 0x01;
        assert!(!entry_matches_attestation(&wrong_msg, &attestation, &digest));

        let mut wrong_key = entry;
        wrong_key.pubkey = Pubkey::new_from_array([4u8; 32]);
        assert!(!entry_matches_attestation(&wrong_key, &attestation, &digest));
    }
}
