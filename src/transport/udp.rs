use anyhow::{anyhow, Context, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use super::{ActuatorEndpoint, CommandSink, TransportError};

/// Non-blocking UDP datagram sink bound to one actuator endpoint.
///
/// The endpoint is resolved once at construction. A send that would block is
/// dropped, never retried.
pub struct UdpCommandSink {
    socket: Option<UdpSocket>,
    peer: SocketAddr,
    datagrams_sent: u64,
}

impl UdpCommandSink {
    pub fn connect(endpoint: &ActuatorEndpoint) -> Result<Self> {
        let addr = endpoint.addr();
        let peer = addr
            .to_socket_addrs()
            .with_context(|| format!("resolve actuator endpoint {}", addr))?
            .next()
            .ok_or_else(|| anyhow!("actuator endpoint {} resolved to no addresses", addr))?;
        let bind_addr = if peer.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr)
            .with_context(|| format!("bind udp socket on {}", bind_addr))?;
        socket
            .connect(peer)
            .with_context(|| format!("connect udp socket to {}", peer))?;
        socket
            .set_nonblocking(true)
            .context("set udp socket non-blocking")?;
        log::info!("udp command sink ready: {} -> {}", bind_addr, peer);
        Ok(Self {
            socket: Some(socket),
            peer,
            datagrams_sent: 0,
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn datagrams_sent(&self) -> u64 {
        self.datagrams_sent
    }

    /// Drop the socket. Later sends fail with `TransportError::Closed`.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            log::debug!("udp command sink to {} closed", self.peer);
        }
    }
}

impl CommandSink for UdpCommandSink {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let socket = self.socket.as_ref().ok_or(TransportError::Closed)?;
        socket.send(bytes)?;
        self.datagrams_sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn delivers_one_byte_datagrams_to_loopback() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let endpoint = ActuatorEndpoint {
            host: "127.0.0.1".to_string(),
            port,
        };
        let mut sink = UdpCommandSink::connect(&endpoint).unwrap();
        assert_eq!(sink.peer(), receiver.local_addr().unwrap());
        sink.send(b"L").unwrap();
        sink.send(b"C").unwrap();

        let mut buf = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"L");
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"C");
        assert_eq!(sink.datagrams_sent(), 2);
    }

    #[test]
    fn closed_sink_rejects_sends() {
        let endpoint = ActuatorEndpoint {
            host: "127.0.0.1".to_string(),
            port: 9,
        };
        let mut sink = UdpCommandSink::connect(&endpoint).unwrap();
        sink.close();
        assert!(matches!(sink.send(b"C"), Err(TransportError::Closed)));
    }
}
