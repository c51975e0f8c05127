//! Write paths: registering labels at the owning hierarchy level

use crate::errors::RegistryError;
use crate::resolver::DnsResolver;
use crate::tx::{self, Call, Signer};
use fedns_net::NetworkConnector;
use fedns_rpc::DescriptorSource;
use fedns_types::AssetDomain;
use std::sync::Arc;
use tracing::info;

/// Registers TLDs, domains, and assets by submitting signed extrinsics to
/// the network that owns the respective map.
pub struct Registry {
    resolver: DnsResolver,
    signer: Signer,
}

impl Registry {
    pub fn new(
        connector: Arc<NetworkConnector>,
        descriptors: Arc<dyn DescriptorSource>,
        root_pointer: impl Into<String>,
        signer: Signer,
    ) -> Self {
        Self {
            resolver: DnsResolver::new(connector, descriptors, root_pointer),
            signer,
        }
    }

    /// Register `label` in the root network's TLD map, pointing at the TLD
    /// network descriptor behind `spec_pointer`.
    pub async fn register_tld(&self, label: &str, spec_pointer: &str) -> Result<(), RegistryError> {
        let root = self.resolver.root_descriptor().await?;
        let connection = self
            .resolver
            .connector()
            .connect(root, None)
            .await
            .map_err(RegistryError::RootUnreachable)?;

        let call = Call::RegisterTld {
            name: label.to_string(),
            spec: spec_pointer.to_string(),
        };
        tx::sign_and_submit(&connection, &call, &self.signer).await?;
        info!(%label, "registered TLD in the root network");
        Ok(())
    }

    /// Register `domain` in its TLD network's domain map, pointing at the
    /// target network descriptor behind `spec_pointer`. The maintainer
    /// field is the signer's address.
    pub async fn register_domain(
        &self,
        domain: &str,
        spec_pointer: &str,
    ) -> Result<(), RegistryError> {
        let tld = fedns_types::top_level_label(domain);
        let tld_pointer = self.resolver.tld_pointer(tld).await?;

        let tld_descriptor = self.resolver.descriptors().fetch(&tld_pointer).await?;
        let connection = self
            .resolver
            .connector()
            .connect(&tld_descriptor, None)
            .await
            .map_err(RegistryError::TldUnreachable)?;

        let call = Call::RegisterDomain {
            name: domain.to_string(),
            spec: spec_pointer.to_string(),
            maintainer: self.signer.address(),
        };
        tx::sign_and_submit(&connection, &call, &self.signer).await?;
        info!(%domain, "registered domain in the TLD network");
        Ok(())
    }

    /// Create an asset on `domain`'s target network, discovered through a
    /// full resolution. Resolver-level failures propagate unchanged.
    pub async fn register_asset(
        &self,
        domain: &str,
        asset_id: u32,
        min_balance: u128,
    ) -> Result<(), RegistryError> {
        let query = AssetDomain::parse(domain);
        let pointer = self.resolver.domain_pointer(&query.domain).await?;

        let descriptor = self.resolver.descriptors().fetch(&pointer).await?;
        let connection = self.resolver.connector().connect(&descriptor, None).await?;

        let call = Call::CreateAsset {
            asset_id,
            owner: self.signer.address(),
            min_balance,
        };
        tx::sign_and_submit(&connection, &call, &self.signer).await?;
        info!(%domain, asset_id, "created asset on the target network");
        Ok(())
    }
}
