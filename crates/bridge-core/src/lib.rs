//! Shared core of the XENCAT X1 bridge.
//!
//! Everything in this crate is used bit-exactly on both sides of the trust
//! boundary: the off-chain validator service signs the digest produced here,
//! and the on-chain light client recomputes the same digest before checking
//! signatures. Any divergence between the two sides produces a different
//! digest and therefore an invalid signature, so this crate is the single
//! source of truth for:
//!
//! - the asset registry (stable asset codes and source-chain mints)
//! - the canonical attestation message layout and its SHA-256 digest
//! - the canonical-form check for Ed25519 signatures

pub mod asset;
pub mod message;
pub mod signature;

pub use asset::Asset;
pub use message::{
    attestation_digest, canonical_message, CANONICAL_MESSAGE_LEN, DOMAIN_SEPARATOR,
};
pub use signature::is_canonical;
