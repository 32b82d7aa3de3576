use super::node::{NodeId, ID_LEN};
use crate::constants::NEIGHBOR_PREFIX_LEN;

/// Length of the tokens handed out in `get_peers` replies.
pub const TOKEN_LEN: usize = 2;

/// The id this node presents to the network.
///
/// One random id is generated at startup and never changes. Every reply
/// advertises a *neighbor* id derived from it: the leading bytes are taken
/// from the id the remote side is asking about so that we look close to it
/// in XOR distance, and the rest stay ours. Derivation is a pure function of
/// the two ids, so a peer that asks twice sees the same answer.
#[derive(Debug, Clone, Copy)]
pub struct NodeIdentity {
    id: NodeId,
    prefix_len: usize,
}

impl NodeIdentity {
    pub fn new(id: NodeId) -> Self {
        Self::with_prefix_len(id, NEIGHBOR_PREFIX_LEN)
    }

    pub fn generate() -> Self {
        Self::new(NodeId::generate())
    }

    /// Builds an identity that borrows `prefix_len` leading bytes from the
    /// context id. Values above 20 are clamped.
    pub fn with_prefix_len(id: NodeId, prefix_len: usize) -> Self {
        Self {
            id,
            prefix_len: prefix_len.min(ID_LEN),
        }
    }

    /// Our own, underived id.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    pub fn derive(&self, context: &NodeId) -> NodeId {
        let mut out = self.id.0;
        out[..self.prefix_len].copy_from_slice(&context.0[..self.prefix_len]);
        NodeId(out)
    }
}

/// The announce token for `info_hash`: its first two bytes.
///
/// Not a secret and never expires. It only satisfies the echo requirement
/// of well-behaved clients.
pub fn token(info_hash: &[u8; ID_LEN]) -> [u8; TOKEN_LEN] {
    [info_hash[0], info_hash[1]]
}

pub fn token_matches(info_hash: &[u8; ID_LEN], candidate: &[u8]) -> bool {
    candidate == token(info_hash).as_slice()
}
