//! External collaborators of the FEDNS client
//!
//! Everything that leaves the process lives behind the traits in this crate:
//! chain access (storage map queries and extrinsic submission over JSON-RPC),
//! dialing, and descriptor-document fetch. The resolver, registry, and
//! connector only ever see the traits, so tests swap in in-memory fakes.

pub mod chain;
pub mod descriptor;
pub mod errors;
pub mod extrinsic;

pub use chain::{ChainClient, Connection, Dialer, HttpChainClient, HttpDialer};
pub use descriptor::{DescriptorSource, HttpDescriptorSource};
pub use errors::*;
pub use extrinsic::SignedExtrinsic;
