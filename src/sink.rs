//! Destinations for harvested announcements.
//!
//! The crawler hands every accepted `announce_peer` to a [`Sink`]. Sinks are
//! best-effort: an error is logged by the caller and otherwise ignored.

use std::fmt;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("channel closed")]
    Closed,

    #[error("channel full")]
    Full,
}

/// A peer announcing that it is downloading `info_hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Announce {
    pub info_hash: [u8; 20],
    pub ip: IpAddr,
    pub port: u16,
}

impl Announce {
    pub fn info_hash_hex(&self) -> String {
        hex::encode(self.info_hash)
    }
}

impl fmt::Display for Announce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}:{}", self.info_hash_hex(), self.ip, self.port)
    }
}

pub trait Sink: Send + Sync {
    fn record(&self, announce: &Announce) -> Result<(), SinkError>;
}

/// Writes each announcement to the `harvest` log target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn record(&self, announce: &Announce) -> Result<(), SinkError> {
        info!(
            target: "harvest",
            info_hash = %announce.info_hash_hex(),
            ip = %announce.ip,
            port = announce.port,
            "announce"
        );
        Ok(())
    }
}

/// Creates one directory per distinct info hash under `root`.
///
/// Repeated announcements of a known hash leave the tree untouched, so the
/// directory listing is the set of hashes seen so far.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for DirectorySink {
    fn record(&self, announce: &Announce) -> Result<(), SinkError> {
        let path = self.root.join(announce.info_hash_hex());
        match std::fs::create_dir(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Forwards announcements to an async consumer.
///
/// Never blocks the handler: when the channel is full the announcement is
/// dropped and reported as [`SinkError::Full`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Announce>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Announce>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Sink for ChannelSink {
    fn record(&self, announce: &Announce) -> Result<(), SinkError> {
        self.tx.try_send(*announce).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn announce(first: u8) -> Announce {
        let mut info_hash = [0x11; 20];
        info_hash[0] = first;
        Announce {
            info_hash,
            ip: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            port: 51413,
        }
    }

    #[test]
    fn test_info_hash_hex() {
        let a = announce(0xab);
        assert_eq!(a.info_hash_hex(), format!("ab{}", "11".repeat(19)));
        assert!(a.to_string().ends_with("from 10.0.0.1:51413"));
    }

    #[test]
    fn test_directory_sink_creates_one_dir_per_hash() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("hashes")).unwrap();

        sink.record(&announce(1)).unwrap();
        sink.record(&announce(1)).unwrap();
        sink.record(&announce(2)).unwrap();

        let entries = std::fs::read_dir(sink.root()).unwrap().count();
        assert_eq!(entries, 2);
        assert!(sink.root().join(announce(2).info_hash_hex()).is_dir());
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_and_reports_full() {
        let (sink, mut rx) = ChannelSink::new(1);

        sink.record(&announce(1)).unwrap();
        assert!(matches!(sink.record(&announce(2)), Err(SinkError::Full)));

        assert_eq!(rx.recv().await, Some(announce(1)));

        drop(rx);
        assert!(matches!(sink.record(&announce(3)), Err(SinkError::Closed)));
    }
}
