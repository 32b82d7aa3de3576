//! Protocol constants and default tuning parameters.

use std::time::Duration;

// ============================================================================
// Network
// ============================================================================

/// Default DHT listen port
pub const DEFAULT_PORT: u16 = 6881;

/// Largest UDP payload we read in one datagram
pub const MAX_DATAGRAM_SIZE: usize = 65535;

/// Well-known routers used to (re)join the network
pub const BOOTSTRAP_NODES: &[&str] = &[
    "router.bittorrent.com:6881",
    "dht.transmissionbt.com:6881",
    "router.utorrent.com:6881",
    "router.bitcomet.com:6881",
    "dht.aelitis.com:6881",
];

// ============================================================================
// Identity
// ============================================================================

/// Leading bytes of a derived id copied from the id the peer asked about.
/// The remaining bytes come from our own id.
pub const NEIGHBOR_PREFIX_LEN: usize = 15;

// ============================================================================
// Crawling
// ============================================================================

/// Delay between two pops of the discovery queue
pub const CRAWL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait before the first starvation check
pub const REJOIN_DELAY: Duration = Duration::from_secs(10);

/// Period of the starvation check
pub const REJOIN_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on nodes waiting in the discovery queue
pub const MAX_QUEUED_NODES: usize = 15_000;
