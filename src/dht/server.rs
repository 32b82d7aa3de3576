use super::crawler::Crawler;
use super::error::DhtError;
use super::identity::NodeIdentity;
use super::node::NodeId;
use super::queue::DiscoveryQueue;
use super::tasks::{crawl_loop, rejoin_loop, resolve_bootstrap};
use super::transport::UdpTransport;
use crate::config::CrawlerConfig;
use crate::constants::MAX_DATAGRAM_SIZE;
use crate::sink::Sink;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

/// A bound crawler: UDP socket, crawler core and the periodic tasks.
///
/// # Examples
///
/// ```no_run
/// use dht_harvest::config::CrawlerConfig;
/// use dht_harvest::dht::DhtServer;
/// use dht_harvest::sink::LogSink;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = DhtServer::bind(CrawlerConfig::default(), Arc::new(LogSink)).await?;
/// server.run(CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub struct DhtServer {
    socket: Arc<UdpSocket>,
    crawler: Arc<Crawler>,
    config: CrawlerConfig,
}

impl DhtServer {
    pub async fn bind(config: CrawlerConfig, sink: Arc<dyn Sink>) -> Result<Self, DhtError> {
        let socket = Arc::new(UdpSocket::bind(config.bind).await?);
        let local_addr = socket.local_addr()?;

        let identity =
            NodeIdentity::with_prefix_len(NodeId::generate(), config.neighbor_prefix_len);
        info!("DHT crawler bound to {} with id {}", local_addr, identity.id());

        let crawler = Crawler::new(
            identity,
            Arc::new(DiscoveryQueue::with_capacity(config.max_queue_len)),
            Arc::new(UdpTransport::new(socket.clone())),
            sink,
        );

        Ok(Self {
            socket,
            crawler: Arc::new(crawler),
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DhtError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn crawler(&self) -> &Arc<Crawler> {
        &self.crawler
    }

    /// Joins the network and serves until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), DhtError> {
        let bootstrap = resolve_bootstrap(&self.config.bootstrap).await;
        let sent = self.crawler.join(&bootstrap);
        info!("Joining DHT via {} bootstrap nodes", sent);

        let crawl = tokio::spawn(crawl_loop(
            self.crawler.clone(),
            self.config.crawl_interval,
            cancel.clone(),
        ));
        let rejoin = tokio::spawn(rejoin_loop(
            self.crawler.clone(),
            self.config.bootstrap.clone(),
            self.config.rejoin_delay,
            self.config.rejoin_interval,
            cancel.clone(),
        ));

        self.receive_loop(&cancel).await;

        let _ = tokio::join!(crawl, rejoin);
        info!("DHT crawler stopped");
        Ok(())
    }

    async fn receive_loop(&self, cancel: &CancellationToken) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                result = self.socket.recv_from(&mut buf) => {
                    let (n, from) = match result {
                        Ok(received) => received,
                        Err(e) => {
                            warn!("DHT socket receive failed: {}", e);
                            continue;
                        }
                    };

                    let datagram = Bytes::copy_from_slice(&buf[..n]);
                    let crawler = self.crawler.clone();
                    tokio::spawn(async move {
                        crawler.handle_datagram(&datagram, from);
                    });
                    trace!("Dispatched {} byte datagram from {}", n, from);
                }
            }
        }
    }
}
