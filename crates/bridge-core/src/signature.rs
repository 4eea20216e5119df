//! Canonical-form check for Ed25519 signatures.
//!
//! An Ed25519 signature is `R || s` where `s` is a scalar. For any valid
//! signature with `s < L` there is a second accepted form `(R, -s mod L)`
//! unless the verifier pins `s` to the canonical range. Replay keys on the
//! signature bytes nowhere in this protocol, but a malleable form would
//! still let a third party re-publish attestations that differ byte-wise
//! from what the validator produced, so the verifier rejects any signature
//! whose `s` is not strictly below the group order.

/// Order of the Ed25519 base point, little-endian:
/// L = 2^252 + 27742317777372353535851937790883648493
const GROUP_ORDER_LE: [u8; 32] = [
    0xED, 0xD3, 0xF5, 0x5C, 0x1A, 0x63, 0x12, 0x58, //
    0xD6, 0x9C, 0xF7, 0xA2, 0xDE, 0xF9, 0xDE, 0x14, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// Whether the signature's `s` component is in canonical form (`s < L`).
///
/// Byte-wise comparison from the most significant limb down; constant-time
/// behaviour is not required because signatures are public inputs.
pub fn is_canonical(signature: &[u8; 64]) -> bool {
    let s = &signature[32..64];
    for i in (0..32).rev() {
        if s[i] < GROUP_ORDER_LE[i] {
            return true;
        }
        if s[i] > GROUP_ORDER_LE[i] {
            return false;
        }
    }
    // s == L exactly: not canonical.
    false
}
