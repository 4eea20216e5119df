use std::str::FromStr;

use anyhow::{bail, Context};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;

use crate::observer::BURN_PROGRAM_ID;

/// Immutable per-process context, built once at startup and shared by
/// every request handler. There is deliberately no mutable state here: the
/// validator key is read-only after startup and each request is
/// independent.
pub struct ServiceContext {
    pub rpc: RpcClient,
    pub source_rpc_url: String,
    pub keypair: Keypair,
    pub burn_program_id: Pubkey,
    pub finality_slots: u64,
}

impl ServiceContext {
    pub fn new(
        source_rpc_url: String,
        validator_private_key: &str,
        finality_slots: u64,
    ) -> anyhow::Result<Self> {
        let keypair = parse_validator_key(validator_private_key)
            .context("VALIDATOR_PRIVATE_KEY is not a valid Ed25519 keypair")?;
        let burn_program_id =
            Pubkey::from_str(BURN_PROGRAM_ID).context("burn program id constant is invalid")?;
        let rpc = RpcClient::new_with_commitment(
            source_rpc_url.clone(),
            CommitmentConfig::confirmed(),
        );

        Ok(Self {
            rpc,
            source_rpc_url,
            keypair,
            burn_program_id,
            finality_slots,
        })
    }
}

/// Parse the validator keypair from its environment encoding.
///
/// Accepts the two encodings Solana tooling produces: the JSON byte array
/// of an id.json file, or a base58 string of the full 64-byte keypair.
pub fn parse_validator_key(raw: &str) -> anyhow::Result<Keypair> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("empty key material");
    }

    let bytes: Vec<u8> = if raw.starts_with('[') {
        serde_json::from_str(raw).context("invalid JSON keypair array")?
    } else {
        bs58::decode(raw)
            .into_vec()
            .context("invalid base58 keypair")?
    };

    Keypair::from_bytes(&bytes).context("keypair must be 64 bytes (secret || public)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_parse_json_array_keypair() {
        let keypair = Keypair::new();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let parsed = parse_validator_key(&json).unwrap();
        assert_eq!(parsed.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_parse_base58_keypair() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let parsed = parse_validator_key(&encoded).unwrap();
        assert_eq!(parsed.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_validator_key("").is_err());
        assert!(parse_validator_key("not-base58-0OIl").is_err());
        assert!(parse_validator_key("[1,2,3]").is_err());
    }
}
