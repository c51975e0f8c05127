//! Error types for the collaborator boundary

use fedns_types::DescriptorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("node rejected request: {0}")]
    Node(String),

    #[error("descriptor fetch failed for {pointer}: {reason}")]
    DescriptorFetch { pointer: String, reason: String },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RpcError>;
