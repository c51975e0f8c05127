//! Cached, single-flight connection establishment

use crate::errors::{ConnectError, Result};
use crate::select::{EntryPointSelector, RandomSelector};
use fedns_rpc::{Connection, Dialer};
use fedns_types::{EntryPoint, NetworkDescriptor};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

/// Dial tuning for [`NetworkConnector`].
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub max_attempts: usize,
    pub dial_timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            dial_timeout: Duration::from_secs(10),
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Produces live connections for network descriptors.
///
/// One connection is held per network id for the lifetime of the connector;
/// a cache hit performs no network activity. First-time establishment is
/// single-flight: concurrent callers for the same id wait on one in-flight
/// dial sequence instead of racing their own.
pub struct NetworkConnector {
    dialer: Arc<dyn Dialer>,
    selector: Box<dyn EntryPointSelector>,
    config: ConnectorConfig,
    cache: Mutex<HashMap<String, Arc<OnceCell<Connection>>>>,
}

impl NetworkConnector {
    pub fn new(dialer: Arc<dyn Dialer>) -> Self {
        Self::with_config(dialer, ConnectorConfig::default())
    }

    pub fn with_config(dialer: Arc<dyn Dialer>, config: ConnectorConfig) -> Self {
        Self {
            dialer,
            selector: Box::new(RandomSelector),
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the entry point selection strategy.
    pub fn with_selector(mut self, selector: Box<dyn EntryPointSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Live connection for `descriptor`, reusing the cached handle when one
    /// exists. `deadline` bounds the whole dial sequence including backoff.
    pub async fn connect(
        &self,
        descriptor: &NetworkDescriptor,
        deadline: Option<Instant>,
    ) -> Result<Connection> {
        descriptor.validate()?;

        let cell = {
            let mut cache = self.cache.lock();
            Arc::clone(cache.entry(descriptor.id.clone()).or_default())
        };
        if let Some(connection) = cell.get() {
            debug!(network = %descriptor.id, "reusing cached connection");
            return Ok(connection.clone());
        }

        let connection = cell
            .get_or_try_init(|| self.dial_network(descriptor, deadline))
            .await?;
        Ok(connection.clone())
    }

    async fn dial_network(
        &self,
        descriptor: &NetworkDescriptor,
        deadline: Option<Instant>,
    ) -> Result<Connection> {
        let mut backoff = self.config.initial_backoff;
        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                self.wait_backoff(&mut backoff, deadline, &descriptor.id)
                    .await?;
            }

            let per_attempt = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(ConnectError::DeadlineExceeded {
                            network: descriptor.id.clone(),
                        });
                    }
                    self.config.dial_timeout.min(deadline - now)
                }
                None => self.config.dial_timeout,
            };

            let index = self
                .selector
                .pick(descriptor.entry_points.len(), attempt);
            let target = EntryPoint::parse(&descriptor.entry_points[index])?.connection_url();
            debug!(network = %descriptor.id, %target, attempt, "dialing entry point");

            match timeout(per_attempt, self.dialer.dial(&target)).await {
                Ok(Some(connection)) => {
                    info!(network = %descriptor.id, %target, attempt, "connected");
                    return Ok(connection);
                }
                Ok(None) => {
                    warn!(network = %descriptor.id, %target, "entry point unreachable");
                }
                Err(_) => {
                    warn!(network = %descriptor.id, %target, "dial attempt timed out");
                }
            }
        }

        Err(ConnectError::Exhausted {
            network: descriptor.id.clone(),
            attempts: self.config.max_attempts,
        })
    }

    async fn wait_backoff(
        &self,
        backoff: &mut Duration,
        deadline: Option<Instant>,
        network: &str,
    ) -> Result<()> {
        if let Some(deadline) = deadline {
            if Instant::now() + *backoff >= deadline {
                return Err(ConnectError::DeadlineExceeded {
                    network: network.to_string(),
                });
            }
        }
        sleep(*backoff).await;
        *backoff = (*backoff * 2).min(self.config.max_backoff);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fedns_rpc::{ChainClient, SignedExtrinsic};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullChain;

    #[async_trait]
    impl ChainClient for NullChain {
        async fn query_map(
            &self,
            _module: &str,
            _item: &str,
            _key: &str,
        ) -> fedns_rpc::Result<Option<String>> {
            Ok(None)
        }

        async fn submit(&self, _extrinsic: &SignedExtrinsic) -> fedns_rpc::Result<()> {
            Ok(())
        }
    }

    /// Fails the first `fail_first` dials, then succeeds.
    struct FlakyDialer {
        dials: AtomicUsize,
        fail_first: usize,
    }

    impl FlakyDialer {
        fn new(fail_first: usize) -> Self {
            Self {
                dials: AtomicUsize::new(0),
                fail_first,
            }
        }

        fn dial_count(&self) -> usize {
            self.dials.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Dialer for FlakyDialer {
        async fn dial(&self, _target: &str) -> Option<Connection> {
            let attempt = self.dials.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_first {
                None
            } else {
                Some(Arc::new(NullChain))
            }
        }
    }

    fn descriptor(id: &str) -> NetworkDescriptor {
        NetworkDescriptor::new(
            id,
            vec![
                "/ip4/127.0.0.1/tcp/9944".into(),
                "/ip4/127.0.0.1/tcp/9945".into(),
            ],
        )
    }

    fn quick_config() -> ConnectorConfig {
        ConnectorConfig {
            max_attempts: 5,
            dial_timeout: Duration::from_secs(1),
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn connection_is_cached_per_network_id() {
        let dialer = Arc::new(FlakyDialer::new(0));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let first = connector.connect(&descriptor("net-a"), None).await.unwrap();
        let second = connector.connect(&descriptor("net-a"), None).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dialer.dial_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_connects_share_one_dial_sequence() {
        let dialer = Arc::new(FlakyDialer::new(1));
        let connector = Arc::new(NetworkConnector::with_config(dialer.clone(), quick_config()));

        let desc = descriptor("net-b");
        let (left, right) = tokio::join!(
            connector.connect(&desc, None),
            connector.connect(&desc, None)
        );

        let left = left.unwrap();
        let right = right.unwrap();
        assert!(Arc::ptr_eq(&left, &right));
        // One failed dial plus the successful one; the second caller never
        // started its own sequence.
        assert_eq!(dialer.dial_count(), 2);
    }

    #[tokio::test]
    async fn empty_entry_point_list_fails_without_dialing() {
        let dialer = Arc::new(FlakyDialer::new(0));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let descriptor = NetworkDescriptor::new("net-c", vec![]);
        let err = connector.connect(&descriptor, None).await.err().unwrap();

        assert!(matches!(
            err,
            ConnectError::Config(fedns_types::DescriptorError::NoEntryPoints { .. })
        ));
        assert_eq!(dialer.dial_count(), 0);
    }

    #[tokio::test]
    async fn malformed_entry_point_is_a_config_error_not_a_retry() {
        let dialer = Arc::new(FlakyDialer::new(0));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let descriptor = NetworkDescriptor::new("net-d", vec!["bogus-address".into()]);
        let err = connector.connect(&descriptor, None).await.err().unwrap();

        assert!(matches!(
            err,
            ConnectError::Config(fedns_types::DescriptorError::MalformedEntryPoint { .. })
        ));
        assert_eq!(dialer.dial_count(), 0);
    }

    #[tokio::test]
    async fn dial_loop_is_bounded() {
        let dialer = Arc::new(FlakyDialer::new(usize::MAX));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let err = connector.connect(&descriptor("net-e"), None).await.err().unwrap();

        assert!(matches!(err, ConnectError::Exhausted { attempts: 5, .. }));
        assert_eq!(dialer.dial_count(), 5);
    }

    #[tokio::test]
    async fn expired_deadline_aborts_before_dialing() {
        let dialer = Arc::new(FlakyDialer::new(0));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let deadline = Instant::now() - Duration::from_millis(1);
        let err = connector
            .connect(&descriptor("net-f"), Some(deadline))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ConnectError::DeadlineExceeded { .. }));
        assert_eq!(dialer.dial_count(), 0);
    }

    #[tokio::test]
    async fn failed_establishment_is_retried_on_the_next_call() {
        let dialer = Arc::new(FlakyDialer::new(5));
        let connector = NetworkConnector::with_config(dialer.clone(), quick_config());

        let desc = descriptor("net-g");
        assert!(connector.connect(&desc, None).await.is_err());

        // The sixth dial succeeds; the cache holds no stale failure.
        let connection = connector.connect(&desc, None).await.unwrap();
        let again = connector.connect(&desc, None).await.unwrap();
        assert!(Arc::ptr_eq(&connection, &again));
        assert_eq!(dialer.dial_count(), 6);
    }
}
