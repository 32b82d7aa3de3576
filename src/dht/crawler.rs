use super::identity::NodeIdentity;
use super::message::{Body, Envelope};
use super::queue::DiscoveryQueue;
use super::transaction::{MethodLabels, TransactionScheme};
use super::transport::Transport;
use crate::sink::Sink;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, trace};

/// The crawler core: everything between a received datagram and the packets
/// and announcements it produces.
///
/// A `Crawler` holds no per-request state. [`handle_datagram`] may run on
/// many tasks at once; the only shared mutable structure is the
/// [`DiscoveryQueue`].
///
/// [`handle_datagram`]: Crawler::handle_datagram
pub struct Crawler {
    pub(super) identity: NodeIdentity,
    pub(super) queue: Arc<DiscoveryQueue>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) sink: Arc<dyn Sink>,
    pub(super) transactions: Arc<dyn TransactionScheme>,
}

impl Crawler {
    pub fn new(
        identity: NodeIdentity,
        queue: Arc<DiscoveryQueue>,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            identity,
            queue,
            transport,
            sink,
            transactions: Arc::new(MethodLabels),
        }
    }

    pub fn with_transactions(mut self, transactions: Arc<dyn TransactionScheme>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn queue(&self) -> &Arc<DiscoveryQueue> {
        &self.queue
    }

    /// Decodes one datagram and routes it to the query or response path.
    ///
    /// Undecodable input and messages without `y` are logged and dropped.
    /// Types other than `q` and `r` are ignored.
    pub fn handle_datagram(&self, data: &[u8], from: SocketAddr) {
        let envelope = match Envelope::parse(data) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(
                    "Failed to parse DHT message from {}: {} (raw: {})",
                    from,
                    e,
                    hex::encode(data)
                );
                return;
            }
        };

        match envelope.body {
            Body::Query { method, args } => {
                self.on_query(envelope.transaction, &method, args, from)
            }
            Body::Response { values, error } => {
                self.on_response(envelope.transaction, values, error, from)
            }
            Body::Other(kind) => {
                trace!(
                    "Ignoring message of type {:?} from {}",
                    String::from_utf8_lossy(&kind),
                    from
                );
            }
        }
    }
}
