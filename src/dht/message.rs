//! KRPC envelopes and the four BEP-5 exchanges.

use super::error::DhtError;
use super::node::{NodeId, RemoteNode, ID_LEN};
use crate::bencode::{decode, encode, Dict, Value};
use bytes::Bytes;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Ping,
    FindNode,
    GetPeers,
    AnnouncePeer,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ping => "ping",
            Method::FindNode => "find_node",
            Method::GetPeers => "get_peers",
            Method::AnnouncePeer => "announce_peer",
        }
    }

    pub fn from_bytes(name: &[u8]) -> Option<Self> {
        match name {
            b"ping" => Some(Method::Ping),
            b"find_node" => Some(Method::FindNode),
            b"get_peers" => Some(Method::GetPeers),
            b"announce_peer" => Some(Method::AnnouncePeer),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded KRPC message, classified by the first byte of `y`.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub transaction: Option<Bytes>,
    pub body: Body,
}

#[derive(Debug, Clone)]
pub enum Body {
    Query {
        method: Bytes,
        args: Option<Dict>,
    },
    Response {
        /// The `r` dictionary.
        values: Option<Dict>,
        /// Whatever the sender put under `e`, if anything.
        error: Option<Value>,
    },
    /// Any other message type, including `e` error frames.
    Other(Bytes),
}

impl Envelope {
    pub fn parse(data: &[u8]) -> Result<Self, DhtError> {
        let mut dict = decode(data)?
            .into_dict()
            .ok_or(DhtError::InvalidMessage("expected dict"))?;

        let kind = dict
            .remove(b"y".as_slice())
            .and_then(|v| v.as_bytes().cloned())
            .ok_or(DhtError::InvalidMessage("missing message type"))?;

        let transaction = dict
            .remove(b"t".as_slice())
            .and_then(|v| v.as_bytes().cloned());

        let body = match kind.first() {
            Some(b'q') => Body::Query {
                method: dict
                    .remove(b"q".as_slice())
                    .and_then(|v| v.as_bytes().cloned())
                    .unwrap_or_default(),
                args: dict.remove(b"a".as_slice()).and_then(Value::into_dict),
            },
            Some(b'r') => Body::Response {
                values: dict.remove(b"r".as_slice()).and_then(Value::into_dict),
                error: dict.remove(b"e".as_slice()),
            },
            _ => Body::Other(kind),
        };

        Ok(Self { transaction, body })
    }
}

/// Arguments of an inbound `announce_peer`.
#[derive(Debug, Clone)]
pub struct AnnounceArgs {
    pub id: NodeId,
    pub info_hash: [u8; ID_LEN],
    pub token: Bytes,
    pub port: Option<i64>,
    pub implied_port: bool,
}

impl AnnounceArgs {
    /// The port the announcing peer accepts connections on. A nonzero
    /// `implied_port` selects the UDP source port of the query itself.
    pub fn peer_port(&self, sender: SocketAddr) -> Option<u16> {
        if self.implied_port {
            return Some(sender.port());
        }
        self.port.and_then(|p| u16::try_from(p).ok())
    }
}

/// An inbound query with the arguments this node acts on.
#[derive(Debug, Clone)]
pub enum Query {
    Ping { id: NodeId },
    FindNode { id: NodeId },
    GetPeers { info_hash: [u8; ID_LEN] },
    AnnouncePeer(AnnounceArgs),
}

impl Query {
    pub fn parse(method: Method, args: &Dict) -> Result<Self, DhtError> {
        let query = match method {
            Method::Ping => Query::Ping {
                id: node_id_arg(args, b"id")?,
            },
            Method::FindNode => Query::FindNode {
                id: node_id_arg(args, b"id")?,
            },
            Method::GetPeers => Query::GetPeers {
                info_hash: node_id_arg(args, b"info_hash")?.0,
            },
            Method::AnnouncePeer => {
                let token = args
                    .get(b"token".as_slice())
                    .and_then(Value::as_bytes)
                    .cloned()
                    .ok_or(DhtError::InvalidMessage("missing token"))?;

                let implied_port = args
                    .get(b"implied_port".as_slice())
                    .and_then(Value::as_integer)
                    .is_some_and(|v| v != 0);

                Query::AnnouncePeer(AnnounceArgs {
                    id: node_id_arg(args, b"id")?,
                    info_hash: node_id_arg(args, b"info_hash")?.0,
                    token,
                    port: args.get(b"port".as_slice()).and_then(Value::as_integer),
                    implied_port,
                })
            }
        };
        Ok(query)
    }
}

fn node_id_arg(args: &Dict, key: &'static [u8]) -> Result<NodeId, DhtError> {
    let raw = args
        .get(key)
        .and_then(Value::as_bytes)
        .ok_or(DhtError::InvalidMessage("missing 20-byte argument"))?;
    NodeId::from_bytes(raw)
}

/// A reply to one of the supported queries.
#[derive(Debug, Clone)]
pub enum Response {
    Ping {
        id: NodeId,
    },
    FindNode {
        id: NodeId,
        nodes: Vec<RemoteNode>,
    },
    GetPeers {
        id: NodeId,
        token: Bytes,
        nodes: Vec<RemoteNode>,
    },
    AnnouncePeer {
        id: NodeId,
    },
}

impl Response {
    pub fn encode(&self, transaction: &[u8]) -> Vec<u8> {
        let mut values = Dict::new();

        match self {
            Response::Ping { id } | Response::AnnouncePeer { id } => {
                values.insert(key(b"id"), Value::bytes(id.as_bytes()));
            }
            Response::FindNode { id, nodes } => {
                values.insert(key(b"id"), Value::bytes(id.as_bytes()));
                values.insert(key(b"nodes"), compact_nodes(nodes));
            }
            Response::GetPeers { id, token, nodes } => {
                values.insert(key(b"id"), Value::bytes(id.as_bytes()));
                values.insert(key(b"token"), Value::Bytes(token.clone()));
                values.insert(key(b"nodes"), compact_nodes(nodes));
            }
        }

        envelope(transaction, b"r", |dict| {
            dict.insert(key(b"r"), Value::Dict(values));
        })
    }
}

/// An outbound query. Only the two kinds the crawler sends are modelled.
#[derive(Debug, Clone)]
pub enum Request {
    FindNode { id: NodeId, target: NodeId },
    GetPeers { id: NodeId, info_hash: [u8; ID_LEN] },
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::FindNode { .. } => Method::FindNode,
            Request::GetPeers { .. } => Method::GetPeers,
        }
    }

    pub fn encode(&self, transaction: &[u8]) -> Vec<u8> {
        let mut args = Dict::new();

        match self {
            Request::FindNode { id, target } => {
                args.insert(key(b"id"), Value::bytes(id.as_bytes()));
                args.insert(key(b"target"), Value::bytes(target.as_bytes()));
            }
            Request::GetPeers { id, info_hash } => {
                args.insert(key(b"id"), Value::bytes(id.as_bytes()));
                args.insert(key(b"info_hash"), Value::bytes(info_hash));
            }
        }

        let method = self.method();
        envelope(transaction, b"q", |dict| {
            dict.insert(key(b"q"), Value::from(method.as_str()));
            dict.insert(key(b"a"), Value::Dict(args));
        })
    }
}

fn key(name: &'static [u8]) -> Bytes {
    Bytes::from_static(name)
}

fn compact_nodes(nodes: &[RemoteNode]) -> Value {
    let compact: Vec<u8> = nodes
        .iter()
        .filter_map(RemoteNode::to_compact)
        .flatten()
        .collect();
    Value::Bytes(Bytes::from(compact))
}

fn envelope(transaction: &[u8], kind: &'static [u8], fill: impl FnOnce(&mut Dict)) -> Vec<u8> {
    let mut dict = Dict::new();
    dict.insert(key(b"t"), Value::bytes(transaction));
    dict.insert(key(b"y"), Value::Bytes(key(kind)));
    fill(&mut dict);
    encode(&Value::Dict(dict))
}
