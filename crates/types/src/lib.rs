//! Shared types for the FEDNS federation client
//!
//! A federation is a strict hierarchy of independently addressable networks:
//! one root network, one network per top-level label, and one target network
//! per domain. This crate carries the descriptor and name types every other
//! crate speaks in.

pub mod descriptor;
pub mod domain;
pub mod errors;

pub use descriptor::{EntryPoint, NetworkDescriptor};
pub use domain::{top_level_label, AssetDomain};
pub use errors::*;
