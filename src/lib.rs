//! dht-harvest - collects info hashes from the BitTorrent DHT
//!
//! The crate runs a Mainline DHT node that keeps itself visible to other
//! nodes and logs the `announce_peer` calls they send it.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding
//! - [`dht`] - BEP-5 KRPC handling, node discovery and crawling
//! - [`sink`] - Destinations for harvested announcements
//! - [`config`] - Runtime settings
//! - [`constants`] - Protocol constants and defaults

pub mod bencode;
pub mod config;
pub mod constants;
pub mod dht;
pub mod sink;

pub use bencode::{decode, encode, BencodeError, Value};
pub use config::CrawlerConfig;
pub use dht::{Crawler, DhtError, DhtServer, DiscoveryQueue, NodeId, NodeIdentity, RemoteNode};
pub use sink::{Announce, ChannelSink, DirectorySink, LogSink, Sink, SinkError};
