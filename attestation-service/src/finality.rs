use crate::error::AttestError;

/// Slots a burn must sit behind the confirmed tip before any validator
/// signs for it. 32 slots is one full confirmation depth on Solana.
pub const DEFAULT_FINALITY_SLOTS: u64 = 32;

/// Source chain slot time, used only for client retry hints.
const MS_PER_SLOT: u64 = 400;

/// The protocol's single temporal dependency: refuse to attest until the
/// burn is at least `required_slots` behind the confirmed tip.
pub fn enforce_finality(
    current_slot: u64,
    burn_slot: u64,
    required_slots: u64,
) -> Result<(), AttestError> {
    let slots_since_burn = current_slot.saturating_sub(burn_slot);
    if slots_since_burn >= required_slots {
        Ok(())
    } else {
        Err(AttestError::NotFinal {
            slots_since_burn,
            required_slots,
        })
    }
}

/// Advisory retry hint for a NotFinal rejection, rounded up to whole
/// seconds so a client sleeping this long lands past the gate.
pub fn retry_after_seconds(slots_since_burn: u64, required_slots: u64) -> u64 {
    let outstanding = required_slots.saturating_sub(slots_since_burn);
    (outstanding * MS_PER_SLOT).div_ceil(1000)
}
