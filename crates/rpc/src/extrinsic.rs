//! Signed extrinsic envelope

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A signed write submitted to one network for inclusion.
///
/// The signature covers [`SignedExtrinsic::signing_payload`] of the same
/// module/call/args triple; signer and signature are hex strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignedExtrinsic {
    pub module: String,
    pub call: String,
    pub args: Vec<Value>,
    pub signer: String,
    pub signature: String,
}

impl SignedExtrinsic {
    /// Canonical byte form of the unsigned call. serde_json maps keep
    /// sorted key order, so the bytes are stable across processes.
    pub fn signing_payload(module: &str, call: &str, args: &[Value]) -> Result<Vec<u8>> {
        let payload = json!({
            "module": module,
            "call": call,
            "args": args,
        });
        Ok(serde_json::to_vec(&payload)?)
    }

    /// Hex form submitted through `author_submitExtrinsic`.
    pub fn to_hex(&self) -> Result<String> {
        Ok(format!("0x{}", hex::encode(serde_json::to_vec(self)?)))
    }
}
