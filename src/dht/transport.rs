use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::trace;

/// Outbound half of the UDP transport.
///
/// Sends are fire-and-forget: nothing waits for delivery and a failed send
/// is only logged.
pub trait Transport: Send + Sync {
    fn send(&self, data: &[u8], addr: SocketAddr);
}

#[derive(Debug, Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
}

impl UdpTransport {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }
}

impl Transport for UdpTransport {
    fn send(&self, data: &[u8], addr: SocketAddr) {
        if let Err(e) = self.socket.try_send_to(data, addr) {
            trace!("Dropped {} byte datagram to {}: {}", data.len(), addr, e);
        }
    }
}
