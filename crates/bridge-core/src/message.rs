//! Canonical attestation message.
//!
//! Validators sign the SHA-256 digest of this exact byte string and the
//! light client recomputes it from the submitted fields:
//!
//! ```text
//! offset  size  field
//! 0       19    domain separator "XENCAT_X1_BRIDGE_V1"
//! 19      1     asset_id
//! 20      8     validator_set_version (little-endian)
//! 28      8     burn_nonce            (little-endian)
//! 36      8     amount                (little-endian)
//! 44      32    user public key
//! ```
//!
//! 76 bytes total. No length prefixes, no padding, no terminator. The
//! advisory attestation timestamp is deliberately NOT part of this message:
//! a field is either inside the digest or outside the trust boundary.

use sha2::{Digest, Sha256};

/// Domain separator for cryptographic signature binding.
/// Prevents cross-domain signature replay attacks.
pub const DOMAIN_SEPARATOR: &[u8; 19] = b"XENCAT_X1_BRIDGE_V1";

/// Exact length of the canonical message in bytes.
pub const CANONICAL_MESSAGE_LEN: usize = 19 + 1 + 8 + 8 + 8 + 32;

/// Build the canonical message.
///
/// SECURITY: every field that an attacker could profit from changing is in
/// here. Including `asset_id` makes a XENCAT signature useless for DGN and
/// vice versa; including `validator_set_version` invalidates every
/// signature the moment the set rotates.
pub fn canonical_message(
    asset_id: u8,
    validator_set_version: u64,
    burn_nonce: u64,
    amount: u64,
    user: &[u8; 32],
) -> [u8; CANONICAL_MESSAGE_LEN] {
    let mut message = [0u8; CANONICAL_MESSAGE_LEN];
    message[0..19].copy_from_slice(DOMAIN_SEPARATOR);
    message[19] = asset_id;
    message[20..28].copy_from_slice(&validator_set_version.to_le_bytes());
    message[28..36].copy_from_slice(&burn_nonce.to_le_bytes());
    message[36..44].copy_from_slice(&amount.to_le_bytes());
    message[44..76].copy_from_slice(user);
    message
}

/// SHA-256 of the canonical message. This 32-byte digest is what validators
/// sign and what the on-chain verifier hands to the Ed25519 precompile.
pub fn attestation_digest(
    asset_id: u8,
    validator_set_version: u64,
    burn_nonce: u64,
    amount: u64,
    user: &[u8; 32],
) -> [u8; 32] {
    let message = canonical_message(asset_id, validator_set_version, burn_nonce, amount, user);
    let digest = Sha256::digest(message);
    digest.into()
}
