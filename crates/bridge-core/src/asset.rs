//! Registry of bridgeable assets.
//!
//! ASSET NAMESPACE IS PERMANENT:
//! - code 1 MUST ALWAYS mean XENCAT
//! - code 2 MUST ALWAYS mean DGN
//! - codes are NEVER reused or reassigned
//!
//! New assets are added by appending variants with fresh codes. The mint
//! table below is authoritative for the off-chain burn observer and for any
//! on-chain sanity checks; a mint that is not listed here is not bridgeable.

/// Source-chain mint of XENCAT (Solana mainnet).
pub const XENCAT_SOURCE_MINT: &str = "7UN8WkBumTUCofVPXCPjNWQ6msQhzrg9tFQRP48Nmw5V";

/// Source-chain mint of DGN (Solana mainnet).
pub const DGN_SOURCE_MINT: &str = "Hrhe54Vk1mRR2SXvyR33Y5xaNGzVYh3gXPcmGRFFVxQr";

/// A bridgeable asset with its frozen wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Asset {
    Xencat = 1,
    Dgn = 2,
}

impl Asset {
    /// All registered assets, in code order.
    pub const ALL: [Asset; 2] = [Asset::Xencat, Asset::Dgn];

    /// The stable one-byte code carried in the canonical message and in
    /// every asset-scoped PDA seed.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code. Unknown codes are rejected, never mapped.
    pub fn from_code(code: u8) -> Option<Asset> {
        match code {
            1 => Some(Asset::Xencat),
            2 => Some(Asset::Dgn),
            _ => None,
        }
    }

    /// Human-readable name, used in logs and the attestation API.
    pub fn name(self) -> &'static str {
        match self {
            Asset::Xencat => "XENCAT",
            Asset::Dgn => "DGN",
        }
    }

    /// The source-chain mint this asset is burned from.
    pub fn source_mint(self) -> &'static str {
        match self {
            Asset::Xencat => XENCAT_SOURCE_MINT,
            Asset::Dgn => DGN_SOURCE_MINT,
        }
    }

    /// Reverse lookup used by the burn observer: which asset, if any, does
    /// a burned mint belong to.
    pub fn from_source_mint(mint: &str) -> Option<Asset> {
        Asset::ALL.iter().copied().find(|a| a.source_mint() == mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_frozen() {
        assert_eq!(Asset::Xencat.code(), 1);
        assert_eq!(Asset::Dgn.code(), 2);
    }

    #[test]
    fn test_from_code_round_trips() {
        for asset in Asset::ALL {
            assert_eq!(Asset::from_code(asset.code()), Some(asset));
        }
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert_eq!(Asset::from_code(0), None);
        assert_eq!(Asset::from_code(3), None);
        assert_eq!(Asset::from_code(255), None);
    }

    #[test]
    fn test_mint_lookup() {
        assert_eq!(Asset::from_source_mint(XENCAT_SOURCE_MINT), Some(Asset::Xencat));
        assert_eq!(Asset::from_source_mint(DGN_SOURCE_MINT), Some(Asset::Dgn));
        assert_eq!(Asset::from_source_mint("So11111111111111111111111111111111111111112"), None);
    }

    #[test]
    fn test_mints_are_distinct() {
        assert_ne!(XENCAT_SOURCE_MINT, DGN_SOURCE_MINT);
    }
}
