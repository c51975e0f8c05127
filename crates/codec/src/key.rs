//! Storage key derivation

use crate::compact::encode_string;

const HASH_WIDTH: usize = 16;

fn hash16(data: &[u8]) -> [u8; HASH_WIDTH] {
    let digest = blake3::hash(data);
    let mut out = [0u8; HASH_WIDTH];
    out.copy_from_slice(&digest.as_bytes()[..HASH_WIDTH]);
    out
}

/// Derive the hex-encoded key addressing one entry of a named map.
///
/// Layout: `H16(module) ‖ H16(item) ‖ H16(hex(encode_string(key))) ‖
/// encode_string(key)`. The key hash covers the `0x`-prefixed hex string of
/// the encoded key, not its raw bytes.
pub fn storage_key(module: &str, item: &str, map_key: &str) -> String {
    let encoded_key = encode_string(map_key);
    let encoded_key_hex = format!("0x{}", hex::encode(&encoded_key));

    let mut raw = Vec::with_capacity(3 * HASH_WIDTH + encoded_key.len());
    raw.extend_from_slice(&hash16(module.as_bytes()));
    raw.extend_from_slice(&hash16(item.as_bytes()));
    raw.extend_from_slice(&hash16(encoded_key_hex.as_bytes()));
    raw.extend_from_slice(&encoded_key);

    format!("0x{}", hex::encode(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout_ends_with_encoded_map_key() {
        let key = storage_key("RootDns", "TldMap", "store");
        assert!(key.starts_with("0x"));

        let raw = hex::decode(&key[2..]).unwrap();
        assert_eq!(raw.len(), 3 * HASH_WIDTH + 1 + "store".len());
        assert_eq!(&raw[3 * HASH_WIDTH..], encode_string("store").as_slice());
    }

    #[test]
    fn derivation_is_deterministic_and_key_sensitive() {
        let a = storage_key("Tld", "DomainMap", "shop.store");
        let b = storage_key("Tld", "DomainMap", "shop.store");
        let c = storage_key("Tld", "DomainMap", "mart.store");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn module_and_item_both_contribute() {
        let base = storage_key("Tld", "DomainMap", "shop.store");
        assert_ne!(base, storage_key("Assets", "DomainMap", "shop.store"));
        assert_ne!(base, storage_key("Tld", "TldMap", "shop.store"));
    }
}
