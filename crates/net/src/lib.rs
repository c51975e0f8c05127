//! Network connector for the FEDNS federation client
//!
//! Turns a [`fedns_types::NetworkDescriptor`] into a live, reusable
//! connection. Successful connections are cached per network id for the
//! lifetime of the connector, first-time establishment is single-flight per
//! id, and the dial loop is bounded with exponential backoff between
//! attempts.

pub mod connector;
pub mod errors;
pub mod select;

pub use connector::{ConnectorConfig, NetworkConnector};
pub use errors::*;
pub use select::{EntryPointSelector, RandomSelector, RoundRobinSelector};
