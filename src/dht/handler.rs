use super::crawler::Crawler;
use super::message::Method;
use super::node::parse_compact_nodes;
use crate::bencode::{Dict, Value};
use bytes::Bytes;
use std::net::SocketAddr;
use tracing::trace;

impl Crawler {
    /// Handles a response, keyed by its transaction label.
    ///
    /// Only `find_node` answers matter: their compact node list feeds the
    /// discovery queue. Some peers put that dictionary under `e` instead of
    /// `r`, so `e` is read when `r` is missing.
    pub(super) fn on_response(
        &self,
        transaction: Option<Bytes>,
        values: Option<Dict>,
        error: Option<Value>,
        from: SocketAddr,
    ) {
        let method = transaction
            .as_deref()
            .and_then(|t| self.transactions.correlate(t));

        match method {
            Some(Method::FindNode) => {
                let carrier = values.or_else(|| error.and_then(Value::into_dict));
                let nodes = carrier
                    .as_ref()
                    .and_then(|dict| dict.get(b"nodes".as_slice()))
                    .and_then(Value::as_bytes);

                if let Some(nodes) = nodes {
                    let queued = self.learn_nodes(nodes);
                    trace!("find_node response from {} queued {} nodes", from, queued);
                }
            }
            Some(Method::Ping | Method::GetPeers | Method::AnnouncePeer) => {}
            None => trace!("Ignoring uncorrelated response from {}", from),
        }
    }

    /// Queues every node in a compact node list that is not already pending.
    /// Returns how many were added.
    pub fn learn_nodes(&self, compact: &[u8]) -> usize {
        parse_compact_nodes(compact)
            .filter(|node| self.queue.push(*node))
            .count()
    }
}
