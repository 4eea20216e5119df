use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::finality::retry_after_seconds;

/// Everything that can go wrong between a user's request and a signed
/// attestation.
///
/// The split matters to clients: input errors are theirs to correct,
/// not-yet errors resolve with time, structural errors mean the burn
/// transaction itself is unacceptable, and transport errors are retried at
/// the transport layer only - this service never retries an observation,
/// because re-attesting over stale data is worse than failing.
#[derive(Debug, Error)]
pub enum AttestError {
    #[error("burn record not found for nonce {nonce}")]
    BurnRecordNotFound { nonce: u64 },

    #[error("no classic SPL token burn found in transaction")]
    NoBurnFound,

    #[error("transaction contains {count} token burns, exactly one required")]
    AmbiguousBurn { count: usize },

    #[error("burned mint {mint} is not a registered asset")]
    UnknownAsset { mint: String },

    #[error("burn belongs to {detected_user}, not {requested_user}")]
    UserMismatch {
        requested_user: String,
        detected_user: String,
    },

    #[error("burned amount is {actual_amount}, request expected {requested_amount}")]
    AmountMismatch {
        requested_amount: u64,
        actual_amount: u64,
    },

    #[error("burn record does not match the burn instruction")]
    BurnRecordMismatch,

    #[error("burn is {slots_since_burn} slots deep, {required_slots} required")]
    NotFinal {
        slots_since_burn: u64,
        required_slots: u64,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("source chain RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AttestError {
    /// Stable machine-readable kind, mirrored in the HTTP body.
    pub fn kind(&self) -> &'static str {
        match self {
            AttestError::BurnRecordNotFound { .. } => "BurnNotFound",
            AttestError::NoBurnFound => "NoBurnFound",
            AttestError::AmbiguousBurn { .. } => "AmbiguousBurn",
            AttestError::UnknownAsset { .. } => "UnknownAsset",
            AttestError::UserMismatch { .. } => "UserMismatch",
            AttestError::AmountMismatch { .. } => "AmountMismatch",
            AttestError::BurnRecordMismatch => "BurnRecordMismatch",
            AttestError::NotFinal { .. } => "NotFinal",
            AttestError::InvalidRequest(_) => "InvalidRequest",
            AttestError::Rpc(_) => "RpcError",
            AttestError::Internal(_) => "Internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AttestError::NoBurnFound
            | AttestError::AmbiguousBurn { .. }
            | AttestError::UnknownAsset { .. }
            | AttestError::UserMismatch { .. }
            | AttestError::AmountMismatch { .. }
            | AttestError::BurnRecordMismatch
            | AttestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AttestError::BurnRecordNotFound { .. } => StatusCode::NOT_FOUND,
            AttestError::NotFinal { .. } => StatusCode::TOO_EARLY,
            AttestError::Rpc(_) | AttestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        let mut body = json!({ "error": self.kind() });
        match self {
            AttestError::BurnRecordNotFound { nonce } => {
                body["burn_nonce"] = json!(nonce);
            }
            AttestError::AmbiguousBurn { count } => {
                body["burn_count"] = json!(count);
            }
            AttestError::UnknownAsset { mint } => {
                body["mint"] = json!(mint);
            }
            AttestError::UserMismatch {
                requested_user,
                detected_user,
            } => {
                body["requested_user"] = json!(requested_user);
                body["detected_user"] = json!(detected_user);
            }
            AttestError::AmountMismatch {
                requested_amount,
                actual_amount,
            } => {
                // The true amount lets honest clients correct and retry
                body["requested_amount"] = json!(requested_amount);
                body["actual_amount"] = json!(actual_amount);
            }
            AttestError::NotFinal {
                slots_since_burn,
                required_slots,
            } => {
                body["slots_since_burn"] = json!(slots_since_burn);
                body["required_slots"] = json!(required_slots);
                body["retry_after_seconds"] =
                    json!(retry_after_seconds(*slots_since_burn, *required_slots));
            }
            AttestError::InvalidRequest(message) | AttestError::Internal(message) => {
                body["message"] = json!(message);
            }
            AttestError::Rpc(err) => {
                body["message"] = json!(err.to_string());
            }
            AttestError::NoBurnFound | AttestError::BurnRecordMismatch => {}
        }
        body
    }
}

impl IntoResponse for AttestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "attestation request failed");
        } else {
            tracing::debug!(error = %self, "attestation request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AttestError::NoBurnFound.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttestError::BurnRecordNotFound { nonce: 7 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AttestError::NotFinal {
                slots_since_burn: 3,
                required_slots: 32
            }
            .status(),
            StatusCode::TOO_EARLY
        );
        assert_eq!(
            AttestError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_final_body_carries_retry_hint() {
        let err = AttestError::NotFinal {
            slots_since_burn: 12,
            required_slots: 32,
        };
        let body = err.body();
        assert_eq!(body["error"], "NotFinal");
        assert_eq!(body["slots_since_burn"], 12);
        assert_eq!(body["required_slots"], 32);
        assert_eq!(body["retry_after_seconds"], 8);
    }

    #[test]
    fn test_amount_mismatch_reveals_true_amount() {
        let err = AttestError::AmountMismatch {
            requested_amount: 5,
            actual_amount: 10_000,
        };
        let body = err.body();
        assert_eq!(body["error"], "AmountMismatch");
        assert_eq!(body["actual_amount"], 10_000);
    }
}
