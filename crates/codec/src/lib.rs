//! Storage key derivation for hierarchical on-network lookup maps
//!
//! Each network of the federation exposes its mappings (TLD map, domain map,
//! asset map) as named key-value maps. A single entry is addressed by an
//! opaque binary key derived from the module name, the storage item name,
//! and the logical map key. The map key is length-prefixed with a compact
//! variable-width integer before hashing, so the derivation is deterministic
//! across implementations.

pub mod compact;
pub mod key;

pub use compact::{decode_compact, decode_string, encode_compact, encode_string};
pub use key::storage_key;
