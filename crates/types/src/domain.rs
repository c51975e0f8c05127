//! Dotted-name parsing
//!
//! A name like `shop.example.store` resolves through the hierarchy keyed by
//! its top-level label (`store`). An optional `/asset/<id>` suffix attaches
//! an asset identifier looked up on the domain's target network.

/// The rightmost dot-delimited label of a domain name.
pub fn top_level_label(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}

/// A parsed lookup name: the domain plus an optional asset identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDomain {
    pub domain: String,
    pub asset_id: Option<String>,
}

impl AssetDomain {
    /// Split `name` on `/`. The asset id is present only when the name has
    /// at least three segments and the second is the literal `asset`.
    pub fn parse(name: &str) -> Self {
        let segments: Vec<&str> = name.split('/').collect();
        let asset_id = if segments.len() >= 3 && segments[1] == "asset" {
            Some(segments[2].to_string())
        } else {
            None
        };
        Self {
            domain: segments[0].to_string(),
            asset_id,
        }
    }

    pub fn tld(&self) -> &str {
        top_level_label(&self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_label_is_last_segment() {
        assert_eq!(top_level_label("shop.example.tld"), "tld");
        assert_eq!(top_level_label("shop"), "shop");
    }

    #[test]
    fn parses_asset_suffix() {
        let parsed = AssetDomain::parse("shop.tld/asset/7");
        assert_eq!(parsed.domain, "shop.tld");
        assert_eq!(parsed.asset_id.as_deref(), Some("7"));
    }

    #[test]
    fn plain_domain_has_no_asset_id() {
        let parsed = AssetDomain::parse("shop.tld");
        assert_eq!(parsed.domain, "shop.tld");
        assert_eq!(parsed.asset_id, None);
    }

    #[test]
    fn asset_marker_must_match_exactly() {
        let parsed = AssetDomain::parse("shop.tld/notasset/7");
        assert_eq!(parsed.asset_id, None);

        let parsed = AssetDomain::parse("shop.tld/asset");
        assert_eq!(parsed.asset_id, None);
    }

    #[test]
    fn tld_of_parsed_name() {
        assert_eq!(AssetDomain::parse("shop.example.tld/asset/7").tld(), "tld");
    }
}
