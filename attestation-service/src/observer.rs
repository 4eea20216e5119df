use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use bridge_core::Asset;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::{
    EncodedTransaction, EncodedTransactionWithStatusMeta, UiInstruction, UiMessage,
    UiParsedInstruction, UiTransactionEncoding,
};
use tracing::{debug, info};

use crate::context::ServiceContext;
use crate::error::AttestError;

/// The immutable burn program on Solana mainnet. Out of this service's
/// control; we only read the records it creates.
pub const BURN_PROGRAM_ID: &str = "2ktujS2t9SRXE9cA4UVQJyDFH9genNR4GngfmGffjKkp";

/// Seed prefix of burn record PDAs, as laid down by the burn program.
pub const BURN_RECORD_SEED: &[u8] = b"burn_record";

/// On-chain burn record, exactly as the burn program stores it (after the
/// 8-byte account discriminator).
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct BurnRecord {
    pub user: [u8; 32],
    pub amount: u64,
    pub nonce: u64,
    pub timestamp: u64,
    pub record_hash: [u8; 32],
    pub bump: u8,
}

/// What the observer learned about one burn, after all structural checks.
#[derive(Debug, Clone)]
pub struct DetectedBurn {
    pub asset: Asset,
    pub user: Pubkey,
    pub amount: u64,
    pub slot: u64,
    pub tx_signature: String,
    pub burned_at: u64,
}

/// A classic SPL token burn instruction pulled out of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTokenBurn {
    pub mint: String,
    pub amount: u64,
    pub authority: Option<String>,
}

/// Deterministic address of the burn record for `nonce`.
pub fn burn_record_address(burn_program_id: &Pubkey, nonce: u64) -> Pubkey {
    Pubkey::find_program_address(&[BURN_RECORD_SEED, &nonce.to_le_bytes()], burn_program_id).0
}

/// Observe the burn identified by `burn_nonce` on the source chain.
///
/// The structural rule here is strict and non-negotiable: the creating
/// transaction must contain EXACTLY ONE classic SPL token burn across all
/// of its instructions, top-level and inner. Anything else would let an
/// attacker bundle a registered-mint burn next to an unrelated one and
/// walk away with an attestation for the wrong event.
pub async fn detect_burn(
    ctx: &ServiceContext,
    burn_nonce: u64,
) -> Result<DetectedBurn, AttestError> {
    let record_address = burn_record_address(&ctx.burn_program_id, burn_nonce);
    debug!(%record_address, burn_nonce, "looking up burn record");

    let account = ctx
        .rpc
        .get_account_with_commitment(&record_address, CommitmentConfig::confirmed())
        .await?
        .value
        .ok_or(AttestError::BurnRecordNotFound { nonce: burn_nonce })?;

    let record = decode_burn_record(&account.data)?;
    if record.nonce != burn_nonce {
        return Err(AttestError::BurnRecordMismatch);
    }

    // The record PDA is written exactly once, at creation; its oldest
    // successful signature is the burn transaction.
    let signatures = ctx
        .rpc
        .get_signatures_for_address(&record_address)
        .await?;
    let creation = signatures
        .iter()
        .filter(|status| status.err.is_none())
        .last()
        .ok_or(AttestError::BurnRecordNotFound { nonce: burn_nonce })?;
    let signature = Signature::from_str(&creation.signature)
        .map_err(|e| AttestError::Internal(format!("bad signature from RPC: {e}")))?;

    let tx = ctx
        .rpc
        .get_transaction_with_config(
            &signature,
            RpcTransactionConfig {
                encoding: Some(UiTransactionEncoding::JsonParsed),
                commitment: Some(CommitmentConfig::confirmed()),
                max_supported_transaction_version: Some(0),
            },
        )
        .await?;

    let burns = collect_token_burns(&tx.transaction)?;
    let burn = expect_single_burn(burns)?;

    let asset = Asset::from_source_mint(&burn.mint).ok_or_else(|| AttestError::UnknownAsset {
        mint: burn.mint.clone(),
    })?;

    // Cross-check the record against the burn instruction: same amount,
    // and the burn authority is the recorded user.
    let user = Pubkey::new_from_array(record.user);
    if burn.amount != record.amount {
        return Err(AttestError::BurnRecordMismatch);
    }
    if let Some(authority) = &burn.authority {
        if *authority != user.to_string() {
            return Err(AttestError::BurnRecordMismatch);
        }
    }

    info!(
        asset = asset.name(),
        burn_nonce,
        %user,
        amount = record.amount,
        slot = tx.slot,
        "burn detected"
    );

    Ok(DetectedBurn {
        asset,
        user,
        amount: record.amount,
        slot: tx.slot,
        tx_signature: creation.signature.clone(),
        burned_at: record.timestamp,
    })
}

/// Decode the burn program's record account, skipping the discriminator.
pub fn decode_burn_record(data: &[u8]) -> Result<BurnRecord, AttestError> {
    if data.len() < 8 {
        return Err(AttestError::Internal(
            "burn record account too short".to_string(),
        ));
    }
    BurnRecord::try_from_slice(&data[8..])
        .map_err(|e| AttestError::Internal(format!("burn record deserialization failed: {e}")))
}

/// Collect every classic SPL token burn in the transaction, walking both
/// top-level and inner instructions. Token-2022 burns are not collected:
/// only the classic token program is accepted by this bridge.
pub fn collect_token_burns(
    tx: &EncodedTransactionWithStatusMeta,
) -> Result<Vec<ParsedTokenBurn>, AttestError> {
    let token_program = spl_token::ID.to_string();
    let mut burns = Vec::new();

    let EncodedTransaction::Json(ui_tx) = &tx.transaction else {
        return Err(AttestError::Internal(
            "expected jsonParsed transaction encoding".to_string(),
        ));
    };
    let UiMessage::Parsed(message) = &ui_tx.message else {
        return Err(AttestError::Internal(
            "expected parsed transaction message".to_string(),
        ));
    };

    for instruction in &message.instructions {
        scan_instruction(instruction, &token_program, &mut burns)?;
    }

    if let Some(meta) = &tx.meta {
        if let OptionSerializer::Some(inner_sets) = &meta.inner_instructions {
            for set in inner_sets {
                for instruction in &set.instructions {
                    scan_instruction(instruction, &token_program, &mut burns)?;
                }
            }
        }
    }

    Ok(burns)
}

/// Enforce the exactly-one-burn rule.
pub fn expect_single_burn(
    mut burns: Vec<ParsedTokenBurn>,
) -> Result<ParsedTokenBurn, AttestError> {
    match burns.len() {
        0 => Err(AttestError::NoBurnFound),
        1 => Ok(burns.remove(0)),
        count => Err(AttestError::AmbiguousBurn { count }),
    }
}

/// Append the instruction to `burns` if it is a classic token-program
/// `Burn` or `BurnChecked`. Everything else, including Token-2022
/// instructions and unparsed instructions, is skipped.
fn scan_instruction(
    instruction: &UiInstruction,
    token_program: &str,
    burns: &mut Vec<ParsedTokenBurn>,
) -> Result<(), AttestError> {
    let UiInstruction::Parsed(UiParsedInstruction::Parsed(parsed)) = instruction else {
        return Ok(());
    };
    if parsed.program_id != token_program {
        return Ok(());
    }

    let Some(ix_type) = parsed.parsed.get("type").and_then(|v| v.as_str()) else {
        return Ok(());
    };
    if ix_type != "burn" && ix_type != "burnChecked" {
        return Ok(());
    }

    let info = parsed
        .parsed
        .get("info")
        .ok_or_else(|| AttestError::Internal("burn instruction missing info".to_string()))?;

    let mint = info
        .get("mint")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AttestError::Internal("burn instruction missing mint".to_string()))?
        .to_string();

    // `burn` carries a raw amount string; `burnChecked` nests it under
    // tokenAmount.
    let raw_amount = if ix_type == "burn" {
        info.get("amount").and_then(|v| v.as_str())
    } else {
        info.get("tokenAmount")
            .and_then(|t| t.get("amount"))
            .and_then(|v| v.as_str())
    };
    let amount = raw_amount
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| AttestError::Internal("burn instruction has no amount".to_string()))?;

    let authority = info
        .get("authority")
        .or_else(|| info.get("multisigAuthority"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    burns.push(ParsedTokenBurn {
        mint,
        amount,
        authority,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_transaction_status::parse_instruction::ParsedInstruction;

    fn parsed_ix(program_id: &str, value: serde_json::Value) -> UiInstruction {
        UiInstruction::Parsed(UiParsedInstruction::Parsed(ParsedInstruction {
            program: "spl-token".to_string(),
            program_id: program_id.to_string(),
            parsed: value,
            stack_height: None,
        }))
    }

    fn burn_ix(mint: &str, amount: u64, authority: &str) -> UiInstruction {
        parsed_ix(
            &spl_token::ID.to_string(),
            json!({
                "type": "burn",
                "info": {
                    "account": "9oa7NAscCZ1kCQFZJng9gfwvDzrEvyWgx4F244PHmHPH",
                    "mint": mint,
                    "authority": authority,
                    "amount": amount.to_string(),
                }
            }),
        )
    }

    #[test]
    fn test_scan_collects_burn() {
        let mut burns = Vec::new();
        let ix = burn_ix(bridge_core::asset::XENCAT_SOURCE_MINT, 10_000, "user111");
        scan_instruction(&ix, &spl_token::ID.to_string(), &mut burns).unwrap();

        assert_eq!(burns.len(), 1);
        assert_eq!(burns[0].amount, 10_000);
        assert_eq!(burns[0].mint, bridge_core::asset::XENCAT_SOURCE_MINT);
        assert_eq!(burns[0].authority.as_deref(), Some("user111"));
    }

    #[test]
    fn test_scan_collects_burn_checked() {
        let mut burns = Vec::new();
        let ix = parsed_ix(
            &spl_token::ID.to_string(),
            json!({
                "type": "burnChecked",
                "info": {
                    "mint": bridge_core::asset::DGN_SOURCE_MINT,
                    "authority": "user111",
                    "tokenAmount": { "amount": "42", "decimals": 6, "uiAmount": 0.000042 }
                }
            }),
        );
        scan_instruction(&ix, &spl_token::ID.to_string(), &mut burns).unwrap();

        assert_eq!(burns.len(), 1);
        assert_eq!(burns[0].amount, 42);
    }

    #[test]
    fn test_scan_skips_token_2022() {
        // Same shape, different program id: not a classic token burn.
        let mut burns = Vec::new();
        let ix = parsed_ix(
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb",
            json!({
                "type": "burn",
                "info": {
                    "mint": bridge_core::asset::XENCAT_SOURCE_MINT,
                    "authority": "user111",
                    "amount": "10000",
                }
            }),
        );
        scan_instruction(&ix, &spl_token::ID.to_string(), &mut burns).unwrap();
        assert!(burns.is_empty());
    }

    #[test]
    fn test_scan_skips_non_burn_token_instructions() {
        let mut burns = Vec::new();
        let ix = parsed_ix(
            &spl_token::ID.to_string(),
            json!({
                "type": "transfer",
                "info": { "amount": "5", "source": "a", "destination": "b" }
            }),
        );
        scan_instruction(&ix, &spl_token::ID.to_string(), &mut burns).unwrap();
        assert!(burns.is_empty());
    }

    #[test]
    fn test_exactly_one_burn_rule() {
        let burn = ParsedTokenBurn {
            mint: bridge_core::asset::XENCAT_SOURCE_MINT.to_string(),
            amount: 10_000,
            authority: None,
        };

        assert!(matches!(
            expect_single_burn(vec![]),
            Err(AttestError::NoBurnFound)
        ));
        assert_eq!(expect_single_burn(vec![burn.clone()]).unwrap(), burn);
        // Two burns are ambiguous even when both are of the same
        // registered mint.
        assert!(matches!(
            expect_single_burn(vec![burn.clone(), burn]),
            Err(AttestError::AmbiguousBurn { count: 2 })
        ));
    }

    #[test]
    fn test_burn_record_round_trip() {
        let record = BurnRecord {
            user: [7u8; 32],
            amount: 10_000,
            nonce: 180,
            timestamp: 1_700_000_000,
            record_hash: [9u8; 32],
            bump: 254,
        };

        // Account layout: 8-byte discriminator, then the Borsh body.
        let mut data = vec![0u8; 8];
        record.serialize(&mut data).unwrap();

        let decoded = decode_burn_record(&data).unwrap();
        assert_eq!(decoded.user, record.user);
        assert_eq!(decoded.amount, record.amount);
        assert_eq!(decoded.nonce, record.nonce);
        assert_eq!(decoded.timestamp, record.timestamp);
    }

    #[test]
    fn test_decode_rejects_short_account() {
        assert!(decode_burn_record(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_burn_record_addresses_differ_by_nonce() {
        let program_id = Pubkey::from_str(BURN_PROGRAM_ID).unwrap();
        let a = burn_record_address(&program_id, 180);
        let b = burn_record_address(&program_id, 181);
        assert_ne!(a, b);
        // Deterministic
        assert_eq!(a, burn_record_address(&program_id, 180));
    }
}
