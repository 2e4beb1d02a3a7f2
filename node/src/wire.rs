//! Newline-delimited JSON request/response types for the host's request loop.

use serde::{Deserialize, Serialize};

use token_ledger::Receipt;
use token_store::KvStore;

use crate::{LedgerHost, NodeError};

// ── Request ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub op: String,
    #[serde(default)]
    pub args: Vec<String>,
}

// ── Response ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub ok: bool,
    /// Hex-encoded payload; empty string for operations without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Payload decoded as a little-endian u64, when it is 8 bytes long.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvokeResponse {
    pub fn success(receipt: &Receipt) -> Self {
        Self {
            ok: true,
            payload: Some(hex::encode(&receipt.payload)),
            value: receipt.as_amount().map(|a| a.raw()),
            kind: None,
            message: None,
        }
    }

    pub fn failure(kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            value: None,
            kind: Some(kind.to_string()),
            message: Some(message.into()),
        }
    }

    pub fn from_result(result: &Result<Receipt, NodeError>) -> Self {
        match result {
            Ok(receipt) => Self::success(receipt),
            // Ledger failures carry their own message without the wrapper prefix.
            Err(NodeError::Ledger(e)) => Self::failure(e.kind().as_str(), e.to_string()),
            Err(e) => Self::failure(e.kind_str(), e.to_string()),
        }
    }

    /// Serialize as a single JSON line (without the trailing newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"kind":"Internal","message":"{e}"}}"#)
        })
    }
}

/// Handle one request line end to end.
pub fn handle_line<S: KvStore>(host: &LedgerHost<S>, line: &str) -> InvokeResponse {
    match serde_json::from_str::<InvokeRequest>(line) {
        Ok(req) => InvokeResponse::from_result(&host.invoke(&req.op, &req.args)),
        Err(e) => InvokeResponse::failure("InvalidRequest", e.to_string()),
    }
}
