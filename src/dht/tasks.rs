//! The crawl loop and the rejoin scheduler.
//!
//! Both run independently of inbound handling and touch the rest of the
//! system only through the discovery queue.

use super::crawler::Crawler;
use super::message::Request;
use super::node::{NodeId, RemoteNode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl Crawler {
    /// One crawl step: pop a node and send it a `find_node` for a random
    /// target and a `get_peers` for a random info hash.
    ///
    /// Neither query is looking for anything. They exist to put us in the
    /// node's routing table and draw inbound traffic.
    pub fn crawl_once(&self) -> Option<RemoteNode> {
        let node = self.queue.pop()?;

        let target = NodeId::generate();
        self.send_query(
            Request::FindNode {
                id: self.identity.derive(&target),
                target,
            },
            node.addr,
        );

        self.send_query(
            Request::GetPeers {
                id: self.identity.derive(&node.id),
                info_hash: NodeId::generate().0,
            },
            node.addr,
        );

        Some(node)
    }

    /// Sends a `find_node` for our own id to every bootstrap address.
    pub fn join(&self, bootstrap: &[SocketAddr]) -> usize {
        let id = *self.identity.id();
        for &addr in bootstrap {
            self.send_query(Request::FindNode { id, target: id }, addr);
        }
        bootstrap.len()
    }

    /// Joins again if the discovery queue has run dry. Returns the number of
    /// queries sent.
    pub fn rejoin(&self, bootstrap: &[SocketAddr]) -> usize {
        if !self.queue.is_empty() {
            return 0;
        }
        self.join(bootstrap)
    }

    pub(super) fn send_query(&self, request: Request, addr: SocketAddr) {
        let label = self.transactions.label(request.method());
        self.transport.send(&request.encode(&label), addr);
    }
}

/// Resolves `host:port` strings, skipping the ones that fail.
pub async fn resolve_bootstrap(hosts: &[String]) -> Vec<SocketAddr> {
    let mut addrs = Vec::with_capacity(hosts.len());

    for host in hosts {
        match tokio::net::lookup_host(host.as_str()).await {
            Ok(mut resolved) => match resolved.find(SocketAddr::is_ipv4) {
                Some(addr) => addrs.push(addr),
                None => warn!("Bootstrap node {} has no IPv4 address", host),
            },
            Err(e) => warn!("Failed to resolve bootstrap node {}: {}", host, e),
        }
    }

    addrs
}

pub async fn crawl_loop(crawler: Arc<Crawler>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                crawler.crawl_once();
            }
        }
    }

    debug!("Crawl loop stopped");
}

pub async fn rejoin_loop(
    crawler: Arc<Crawler>,
    bootstrap: Vec<String>,
    delay: Duration,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if !crawler.queue().is_empty() {
                    continue;
                }
                info!("Discovery queue is empty, rejoining the DHT");
                let addrs = resolve_bootstrap(&bootstrap).await;
                crawler.rejoin(&addrs);
            }
        }
    }

    debug!("Rejoin scheduler stopped");
}
