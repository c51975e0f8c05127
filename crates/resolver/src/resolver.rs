//! Root → TLD → domain → asset resolution walk

use crate::errors::{Level, ResolveError};
use fedns_net::NetworkConnector;
use fedns_rpc::{Connection, DescriptorSource};
use fedns_types::{AssetDomain, NetworkDescriptor};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Storage map names across the hierarchy.
pub const ROOT_MODULE: &str = "RootDns";
pub const ROOT_TLD_MAP: &str = "TldMap";
pub const TLD_MODULE: &str = "Tld";
pub const TLD_DOMAIN_MAP: &str = "DomainMap";
pub const ASSETS_MODULE: &str = "Assets";
pub const ASSETS_ASSET_MAP: &str = "Asset";

/// Outcome of a resolution: the domain's descriptor pointer, or the asset
/// record when the name carried an `/asset/<id>` locator.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Pointer(String),
    Asset(Value),
}

/// Resolves dotted names by walking the federation hierarchy.
///
/// Every call visits the TLD map and then the domain map, in that order,
/// before an optional asset lookup; no level is ever skipped. Calls are
/// idempotent with respect to external state and safe to issue
/// concurrently; connections are shared through the connector cache.
pub struct DnsResolver {
    connector: Arc<NetworkConnector>,
    descriptors: Arc<dyn DescriptorSource>,
    root_pointer: String,
    root: OnceCell<NetworkDescriptor>,
}

impl DnsResolver {
    pub fn new(
        connector: Arc<NetworkConnector>,
        descriptors: Arc<dyn DescriptorSource>,
        root_pointer: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            descriptors,
            root_pointer: root_pointer.into(),
            root: OnceCell::new(),
        }
    }

    /// Prime the root descriptor so later calls fail fast on a bad root
    /// pointer. Optional; [`DnsResolver::resolve`] fetches it on demand.
    pub async fn init(&self) -> Result<(), ResolveError> {
        self.root_descriptor().await.map(|_| ())
    }

    /// Resolve `name` to its target descriptor pointer, or to an asset
    /// record when the name carries an asset locator.
    pub async fn resolve(&self, name: &str) -> Result<Resolution, ResolveError> {
        let query = AssetDomain::parse(name);
        debug!(domain = %query.domain, asset = ?query.asset_id, "resolving");

        let pointer = self.domain_pointer(&query.domain).await?;
        let asset_id = match &query.asset_id {
            None => return Ok(Resolution::Pointer(pointer)),
            Some(asset_id) => asset_id,
        };

        let descriptor = self.descriptors.fetch(&pointer).await?;
        let connection = self.connector.connect(&descriptor, None).await?;
        let record = connection
            .query_map(ASSETS_MODULE, ASSETS_ASSET_MAP, asset_id)
            .await?
            .ok_or_else(|| ResolveError::NotFound {
                level: Level::Asset,
                key: asset_id.clone(),
            })?;
        Ok(Resolution::Asset(parse_record(record)))
    }

    /// Descriptor pointer of the TLD network owning `tld`, looked up in the
    /// root network's TLD map.
    pub async fn tld_pointer(&self, tld: &str) -> Result<String, ResolveError> {
        let root = self.root_descriptor().await?;
        let connection = self.connect_at(root, Level::Root).await?;
        connection
            .query_map(ROOT_MODULE, ROOT_TLD_MAP, tld)
            .await?
            .ok_or_else(|| ResolveError::NotFound {
                level: Level::Tld,
                key: tld.to_string(),
            })
    }

    /// Descriptor pointer of `domain`'s target network, looked up in its
    /// TLD network's domain map.
    pub async fn domain_pointer(&self, domain: &str) -> Result<String, ResolveError> {
        let tld = fedns_types::top_level_label(domain);
        let tld_pointer = self.tld_pointer(tld).await?;

        let tld_descriptor = self.descriptors.fetch(&tld_pointer).await?;
        let connection = self.connect_at(&tld_descriptor, Level::Tld).await?;
        connection
            .query_map(TLD_MODULE, TLD_DOMAIN_MAP, domain)
            .await?
            .ok_or_else(|| ResolveError::NotFound {
                level: Level::Domain,
                key: domain.to_string(),
            })
    }

    /// Root network descriptor, fetched once per resolver.
    pub async fn root_descriptor(&self) -> Result<&NetworkDescriptor, ResolveError> {
        self.root
            .get_or_try_init(|| async {
                let descriptor = self.descriptors.fetch(&self.root_pointer).await?;
                Ok(descriptor)
            })
            .await
    }

    /// Connect with the hierarchy level attached to any failure.
    async fn connect_at(
        &self,
        descriptor: &NetworkDescriptor,
        level: Level,
    ) -> Result<Connection, ResolveError> {
        self.connector
            .connect(descriptor, None)
            .await
            .map_err(|source| ResolveError::Connect { level, source })
    }

    pub(crate) fn connector(&self) -> &Arc<NetworkConnector> {
        &self.connector
    }

    pub(crate) fn descriptors(&self) -> &Arc<dyn DescriptorSource> {
        &self.descriptors
    }
}

/// Asset records are stored as text; surface JSON when they parse as such.
fn parse_record(record: String) -> Value {
    serde_json::from_str(&record).unwrap_or(Value::String(record))
}
