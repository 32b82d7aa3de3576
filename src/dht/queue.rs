use super::node::RemoteNode;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

/// FIFO of nodes waiting to be crawled, with no duplicate pending entries.
///
/// Any number of inbound handlers may push while the crawl loop pops. The
/// membership set and the FIFO sit behind one lock so that check-and-insert
/// and remove-on-pop are each a single atomic step.
#[derive(Debug)]
pub struct DiscoveryQueue {
    inner: Mutex<Inner>,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct Inner {
    pending: HashSet<RemoteNode>,
    order: VecDeque<RemoteNode>,
}

impl DiscoveryQueue {
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// A queue that refuses new nodes while `capacity` are already pending.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity,
        }
    }

    /// Adds `node` unless the same id and address is already pending or the
    /// queue is full. Returns whether it was added.
    pub fn push(&self, node: RemoteNode) -> bool {
        let mut inner = self.inner.lock();

        if self.capacity.is_some_and(|cap| inner.order.len() >= cap) {
            return false;
        }

        if !inner.pending.insert(node) {
            return false;
        }
        inner.order.push_back(node);
        true
    }

    /// Takes the oldest pending node without waiting.
    pub fn pop(&self) -> Option<RemoteNode> {
        let mut inner = self.inner.lock();
        let node = inner.order.pop_front()?;
        inner.pending.remove(&node);
        Some(node)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DiscoveryQueue {
    fn default() -> Self {
        Self::new()
    }
}
