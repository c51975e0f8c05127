//! Transaction building, signing, and submission

use crate::errors::TxError;
use ed25519_dalek::{Signer as _, SigningKey};
use fedns_rpc::{Connection, SignedExtrinsic};
use serde_json::{json, Value};
use tracing::debug;

/// A write against one network of the federation. Each variant maps to a
/// distinct module/call pair and positional argument shape on the owning
/// network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Register a top-level label in the root network's TLD map.
    RegisterTld { name: String, spec: String },
    /// Register a domain in a TLD network's domain map.
    RegisterDomain {
        name: String,
        spec: String,
        maintainer: String,
    },
    /// Create an asset on a domain's target network.
    CreateAsset {
        asset_id: u32,
        owner: String,
        min_balance: u128,
    },
}

impl Call {
    pub fn module(&self) -> &'static str {
        match self {
            Call::RegisterTld { .. } => "RootDns",
            Call::RegisterDomain { .. } => "Tld",
            Call::CreateAsset { .. } => "Assets",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Call::RegisterTld { .. } => "register_tld",
            Call::RegisterDomain { .. } => "register_domain",
            Call::CreateAsset { .. } => "create",
        }
    }

    /// Positional arguments in the order the target module declares them.
    /// Balances travel as decimal strings.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Call::RegisterTld { name, spec } => vec![json!(name), json!(spec)],
            Call::RegisterDomain {
                name,
                spec,
                maintainer,
            } => vec![json!(name), json!(spec), json!(maintainer)],
            Call::CreateAsset {
                asset_id,
                owner,
                min_balance,
            } => vec![
                json!(asset_id),
                json!(owner),
                json!(min_balance.to_string()),
            ],
        }
    }
}

/// Signing account derived deterministically from a seed phrase.
pub struct Signer {
    key: SigningKey,
}

const PHRASE_CONTEXT: &[u8] = b"fedns-extrinsic-signer-v1";

impl Signer {
    pub fn from_phrase(phrase: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(PHRASE_CONTEXT);
        hasher.update(phrase.trim().as_bytes());
        let digest = hasher.finalize();

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest.as_bytes()[..32]);
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Hex form of the account's public key; doubles as its on-network
    /// address.
    pub fn address(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, payload: &[u8]) -> String {
        hex::encode(self.key.sign(payload).to_bytes())
    }
}

/// Build and sign `call`, then submit it over `connection` for inclusion.
pub async fn sign_and_submit(
    connection: &Connection,
    call: &Call,
    signer: &Signer,
) -> Result<(), TxError> {
    let args = call.args();
    let payload = SignedExtrinsic::signing_payload(call.module(), call.method(), &args)
        .map_err(|err| TxError::Sign(err.to_string()))?;

    let extrinsic = SignedExtrinsic {
        module: call.module().to_string(),
        call: call.method().to_string(),
        args,
        signer: signer.address(),
        signature: signer.sign(&payload),
    };
    debug!(module = extrinsic.module, call = extrinsic.call, "submitting extrinsic");

    connection.submit(&extrinsic).await.map_err(TxError::Submit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    #[test]
    fn signer_is_deterministic_over_the_phrase() {
        let a = Signer::from_phrase("lecture mosquito vault pyramid");
        let b = Signer::from_phrase("lecture mosquito vault pyramid");
        let c = Signer::from_phrase("lecture mosquito vault obelisk");
        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), c.address());

        // Leading/trailing whitespace does not change the account.
        let padded = Signer::from_phrase(" lecture mosquito vault pyramid ");
        assert_eq!(a.address(), padded.address());
    }

    #[test]
    fn signature_verifies_against_the_advertised_address() {
        let signer = Signer::from_phrase("lecture mosquito vault pyramid");
        let call = Call::RegisterTld {
            name: "store".into(),
            spec: "http://descriptors/store.json".into(),
        };

        let payload =
            SignedExtrinsic::signing_payload(call.module(), call.method(), &call.args()).unwrap();
        let signature_hex = signer.sign(&payload);

        let public = VerifyingKey::from_bytes(
            &hex::decode(signer.address()).unwrap().try_into().unwrap(),
        )
        .unwrap();
        let signature =
            Signature::from_bytes(&hex::decode(signature_hex).unwrap().try_into().unwrap());
        assert!(public.verify(&payload, &signature).is_ok());
    }

    #[test]
    fn calls_map_to_their_owning_modules() {
        let tld = Call::RegisterTld {
            name: "store".into(),
            spec: "spec".into(),
        };
        assert_eq!(tld.module(), "RootDns");
        assert_eq!(tld.method(), "register_tld");
        assert_eq!(tld.args().len(), 2);

        let domain = Call::RegisterDomain {
            name: "shop.store".into(),
            spec: "spec".into(),
            maintainer: "aa".into(),
        };
        assert_eq!(domain.module(), "Tld");
        assert_eq!(domain.args().len(), 3);

        let asset = Call::CreateAsset {
            asset_id: 7,
            owner: "aa".into(),
            min_balance: 1,
        };
        assert_eq!(asset.module(), "Assets");
        assert_eq!(asset.args(), vec![json!(7), json!("aa"), json!("1")]);
    }
}
