use crate::constants::{
    BOOTSTRAP_NODES, CRAWL_INTERVAL, DEFAULT_PORT, MAX_QUEUED_NODES, NEIGHBOR_PREFIX_LEN,
    REJOIN_DELAY, REJOIN_INTERVAL,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Runtime settings for a [`Crawler`](crate::dht::Crawler) and its server.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Local UDP address to listen on.
    pub bind: SocketAddr,
    /// `host:port` strings, resolved on every join.
    pub bootstrap: Vec<String>,
    pub crawl_interval: Duration,
    pub rejoin_delay: Duration,
    pub rejoin_interval: Duration,
    /// Bytes of a derived id taken from the peer's context id.
    pub neighbor_prefix_len: usize,
    /// `None` leaves the discovery queue unbounded.
    pub max_queue_len: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            bootstrap: BOOTSTRAP_NODES.iter().map(|s| s.to_string()).collect(),
            crawl_interval: CRAWL_INTERVAL,
            rejoin_delay: REJOIN_DELAY,
            rejoin_interval: REJOIN_INTERVAL,
            neighbor_prefix_len: NEIGHBOR_PREFIX_LEN,
            max_queue_len: Some(MAX_QUEUED_NODES),
        }
    }
}
