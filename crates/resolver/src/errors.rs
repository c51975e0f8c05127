//! Error types for resolution and registration

use fedns_net::ConnectError;
use fedns_rpc::RpcError;
use fedns_types::DescriptorError;
use std::fmt;
use thiserror::Error;

/// Hierarchy level at which a lookup or connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Root,
    Tld,
    Domain,
    Asset,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Root => "root",
            Level::Tld => "TLD",
            Level::Domain => "domain",
            Level::Asset => "asset",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{level} entry not found: {key}")]
    NotFound { level: Level, key: String },

    #[error("could not connect to the {level} network: {source}")]
    Connect {
        level: Level,
        source: ConnectError,
    },

    /// Connection failures below the TLD hop surface without hierarchy
    /// context.
    #[error(transparent)]
    Connection(#[from] ConnectError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Config(#[from] DescriptorError),
}

#[derive(Error, Debug)]
pub enum TxError {
    #[error("could not sign transaction payload: {0}")]
    Sign(String),

    #[error("transaction submission failed: {0}")]
    Submit(#[source] RpcError),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("could not connect to the root network: {0}")]
    RootUnreachable(#[source] ConnectError),

    #[error("could not connect to the TLD network: {0}")]
    TldUnreachable(#[source] ConnectError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Connection(#[from] ConnectError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Transaction(#[from] TxError),
}
