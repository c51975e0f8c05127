//! Hierarchical name resolution and registration
//!
//! The federation arranges its networks in a strict hierarchy: the root
//! network maps top-level labels to TLD networks, each TLD network maps
//! domains to target networks, and a target network may carry asset records.
//! [`DnsResolver`] walks that hierarchy downward; [`Registry`] writes new
//! mappings at the owning level by submitting signed extrinsics.

pub mod errors;
pub mod registry;
pub mod resolver;
pub mod tx;

pub use errors::*;
pub use registry::Registry;
pub use resolver::{DnsResolver, Resolution};
pub use tx::{Call, Signer};
