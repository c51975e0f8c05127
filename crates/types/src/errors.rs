//! Configuration error types shared across the workspace

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("network descriptor has no id")]
    MissingId,

    #[error("network descriptor {id} has no entry points")]
    NoEntryPoints { id: String },

    #[error("malformed entry point address: {addr}")]
    MalformedEntryPoint { addr: String },
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
