use super::crawler::Crawler;
use super::identity::{token, token_matches};
use super::message::{AnnounceArgs, Method, Query, Response};
use super::node::NodeId;
use crate::bencode::Dict;
use crate::sink::Announce;
use bytes::Bytes;
use std::net::SocketAddr;
use tracing::{debug, info, trace, warn};

impl Crawler {
    pub(super) fn on_query(
        &self,
        transaction: Option<Bytes>,
        method: &[u8],
        args: Option<Dict>,
        from: SocketAddr,
    ) {
        let Some(method) = Method::from_bytes(method) else {
            trace!(
                "Ignoring unsupported query {:?} from {}",
                String::from_utf8_lossy(method),
                from
            );
            return;
        };

        let (Some(transaction), Some(args)) = (transaction, args) else {
            trace!("Dropping {} query without t or a from {}", method, from);
            return;
        };

        let query = match Query::parse(method, &args) {
            Ok(query) => query,
            Err(e) => {
                trace!("Dropping {} query from {}: {}", method, from, e);
                return;
            }
        };

        let (response, announce) = match query {
            Query::AnnouncePeer(args) => match self.accept_announce(&args, from) {
                Some(announce) => (
                    Response::AnnouncePeer {
                        id: self.identity.derive(&args.id),
                    },
                    Some(announce),
                ),
                None => return,
            },
            query => (self.respond(query), None),
        };

        self.transport.send(&response.encode(&transaction), from);

        if let Some(announce) = announce {
            self.harvest(&announce);
        }
    }

    /// Builds the reply to a `ping`, `find_node` or `get_peers` query.
    ///
    /// Node lists are always empty: this node never shares routing
    /// knowledge. `get_peers` hands out a valid token so the caller moves on
    /// to `announce_peer`.
    pub fn respond(&self, query: Query) -> Response {
        match query {
            Query::Ping { id } => Response::Ping {
                id: self.identity.derive(&id),
            },
            Query::FindNode { id } => Response::FindNode {
                id: self.identity.derive(&id),
                nodes: Vec::new(),
            },
            Query::GetPeers { info_hash } => Response::GetPeers {
                id: self.identity.derive(&NodeId(info_hash)),
                token: Bytes::copy_from_slice(&token(&info_hash)),
                nodes: Vec::new(),
            },
            Query::AnnouncePeer(args) => Response::AnnouncePeer {
                id: self.identity.derive(&args.id),
            },
        }
    }

    /// Checks an `announce_peer` and resolves the announced peer.
    ///
    /// A bad token or an unusable port yields `None`; the query then gets no
    /// reply and has no effect.
    pub fn accept_announce(&self, args: &AnnounceArgs, from: SocketAddr) -> Option<Announce> {
        if !token_matches(&args.info_hash, &args.token) {
            debug!("Rejecting announce_peer from {} - invalid token", from);
            return None;
        }

        let Some(port) = args.peer_port(from) else {
            debug!("Rejecting announce_peer from {} - invalid port", from);
            return None;
        };

        Some(Announce {
            info_hash: args.info_hash,
            ip: from.ip(),
            port,
        })
    }

    fn harvest(&self, announce: &Announce) {
        info!(
            "info_hash[announce_peer]: {}:{} - {}",
            announce.ip,
            announce.port,
            announce.info_hash_hex()
        );

        if let Err(e) = self.sink.record(announce) {
            warn!("Failed to record {}: {}", announce, e);
        }
    }
}
