//! A harvesting participant in the BitTorrent DHT ([BEP-5]).
//!
//! The node answers `ping`, `find_node`, `get_peers` and `announce_peer`
//! just well enough to stay in other nodes' routing tables, advertises ids
//! close to whatever the asker is looking for, and records every valid
//! `announce_peer` it receives. It keeps no routing table and stores no
//! peers. New nodes come from `find_node` replies and are crawled once.
//!
//! [BEP-5]: http://bittorrent.org/beps/bep_0005.html

mod crawler;
mod error;
mod handler;
mod identity;
mod message;
mod node;
mod queue;
mod responder;
mod server;
mod tasks;
mod transaction;
mod transport;

pub use crawler::Crawler;
pub use error::DhtError;
pub use identity::{token, token_matches, NodeIdentity, TOKEN_LEN};
pub use message::{AnnounceArgs, Body, Envelope, Method, Query, Request, Response};
pub use node::{parse_compact_nodes, NodeId, RemoteNode, COMPACT_NODE_LEN, ID_LEN};
pub use queue::DiscoveryQueue;
pub use server::DhtServer;
pub use tasks::{crawl_loop, rejoin_loop, resolve_bootstrap};
pub use transaction::{MethodLabels, TransactionScheme};
pub use transport::{Transport, UdpTransport};
