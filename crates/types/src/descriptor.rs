//! Network descriptors and entry point addresses

use crate::errors::{DescriptorError, Result};
use serde::{Deserialize, Serialize};

/// Identifies one network of the federation and how to reach it.
///
/// Descriptor documents are hosted as plain JSON; `id` is globally unique
/// across the federation and keys the connector cache. Older documents call
/// the entry-point list `bootNodes`, so both field names are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub id: String,
    #[serde(rename = "entryPoints", alias = "bootNodes")]
    pub entry_points: Vec<String>,
}

impl NetworkDescriptor {
    pub fn new(id: impl Into<String>, entry_points: Vec<String>) -> Self {
        Self {
            id: id.into(),
            entry_points,
        }
    }

    /// A descriptor with no id cannot be cached and one with no entry
    /// points can never be dialed; both are configuration errors.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(DescriptorError::MissingId);
        }
        if self.entry_points.is_empty() {
            return Err(DescriptorError::NoEntryPoints {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// A dialable node address parsed out of its multi-segment string form.
///
/// Addresses are slash-delimited, e.g. `/ip4/127.0.0.1/tcp/9944`: the host
/// occupies segment 2 and the port segment 4. Anything else is a
/// configuration error, never a retryable dial failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub host: String,
    pub port: u16,
}

impl EntryPoint {
    pub fn parse(addr: &str) -> Result<Self> {
        let segments: Vec<&str> = addr.split('/').collect();
        if segments.len() < 5 {
            return Err(DescriptorError::MalformedEntryPoint {
                addr: addr.to_string(),
            });
        }
        let host = segments[2];
        if host.is_empty() {
            return Err(DescriptorError::MalformedEntryPoint {
                addr: addr.to_string(),
            });
        }
        let port = segments[4]
            .parse::<u16>()
            .map_err(|_| DescriptorError::MalformedEntryPoint {
                addr: addr.to_string(),
            })?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Dial target in `<scheme>://<host>:<port>` form.
    pub fn connection_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiaddr_shaped_entry_point() {
        let ep = EntryPoint::parse("/ip4/10.0.0.7/tcp/9944").unwrap();
        assert_eq!(ep.host, "10.0.0.7");
        assert_eq!(ep.port, 9944);
        assert_eq!(ep.connection_url(), "http://10.0.0.7:9944");
    }

    #[test]
    fn rejects_short_and_empty_addresses() {
        assert!(EntryPoint::parse("/ip4/10.0.0.7").is_err());
        assert!(EntryPoint::parse("/ip4//tcp/9944").is_err());
        assert!(EntryPoint::parse("/ip4/10.0.0.7/tcp/no-port").is_err());
    }

    #[test]
    fn accepts_legacy_boot_nodes_field() {
        let descriptor: NetworkDescriptor =
            serde_json::from_str(r#"{"id":"root","bootNodes":["/ip4/127.0.0.1/tcp/9944"]}"#)
                .unwrap();
        assert_eq!(descriptor.id, "root");
        assert_eq!(descriptor.entry_points.len(), 1);

        let descriptor: NetworkDescriptor =
            serde_json::from_str(r#"{"id":"root","entryPoints":["/ip4/127.0.0.1/tcp/9944"]}"#)
                .unwrap();
        assert_eq!(descriptor.entry_points.len(), 1);
    }

    #[test]
    fn validate_flags_missing_fields() {
        let descriptor = NetworkDescriptor::new("", vec!["/ip4/127.0.0.1/tcp/9944".into()]);
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::MissingId)
        ));

        let descriptor = NetworkDescriptor::new("root", vec![]);
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::NoEntryPoints { .. })
        ));
    }
}
