//! Bencode encoding and decoding ([BEP-3]).
//!
//! KRPC messages are bencoded dictionaries. This module carries only what
//! the DHT wire format needs: a [`Value`] tree, a strict [`decode`] that
//! rejects malformed or trailing input, and a deterministic [`encode`].
//!
//! ```
//! use dht_harvest::bencode::{decode, encode, Value};
//!
//! let value = decode(b"d1:y1:qe").unwrap();
//! assert_eq!(value.get(b"y").and_then(Value::as_bytes).map(|b| &b[..]), Some(&b"q"[..]));
//! assert_eq!(encode(&value), b"d1:y1:qe");
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::BencodeError;
pub use value::{Dict, Value};

#[cfg(test)]
mod tests;
