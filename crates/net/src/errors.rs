//! Error types for connection establishment

use fedns_types::DescriptorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("no entry point of network {network} could be reached after {attempts} attempts")]
    Exhausted { network: String, attempts: usize },

    #[error("deadline exceeded while connecting to network {network}")]
    DeadlineExceeded { network: String },

    #[error(transparent)]
    Config(#[from] DescriptorError),
}

pub type Result<T> = std::result::Result<T, ConnectError>;
