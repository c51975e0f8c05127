//! Descriptor document fetch

use crate::errors::{Result, RpcError};
use async_trait::async_trait;
use fedns_types::NetworkDescriptor;
use std::time::Duration;
use tracing::debug;

/// Resolves a descriptor pointer (URL) into the descriptor document behind
/// it. Pointers are stored in the hierarchy's maps, so every level of the
/// walk goes through this.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    async fn fetch(&self, pointer: &str) -> Result<NetworkDescriptor>;
}

/// Plain HTTP GET returning `{ id, entryPoints }` JSON.
#[derive(Debug, Clone)]
pub struct HttpDescriptorSource {
    http: reqwest::Client,
}

impl HttpDescriptorSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        })
    }
}

#[async_trait]
impl DescriptorSource for HttpDescriptorSource {
    async fn fetch(&self, pointer: &str) -> Result<NetworkDescriptor> {
        debug!(%pointer, "fetching network descriptor");
        let response = self.http.get(pointer).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::DescriptorFetch {
                pointer: pointer.to_string(),
                reason: format!("http status {}", response.status()),
            });
        }
        let descriptor = response
            .json::<NetworkDescriptor>()
            .await
            .map_err(|err| RpcError::DescriptorFetch {
                pointer: pointer.to_string(),
                reason: err.to_string(),
            })?;
        descriptor.validate()?;
        Ok(descriptor)
    }
}
