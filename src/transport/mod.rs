//! Actuator transport.
//!
//! The kernel hands single command bytes to a `CommandSink`. Sinks are
//! fire-and-forget: they never wait for an acknowledgment and must return
//! promptly even when the link is congested.

mod endpoint;
mod sink;
mod udp;

pub use endpoint::{parse_actuator_endpoint, ActuatorEndpoint};
pub use sink::{LogSink, MemorySink};
pub use udp::UdpCommandSink;

/// Failure to hand a command to the link. Callers log and discard it.
#[derive(Debug)]
pub enum TransportError {
    /// The send would have blocked; the datagram was dropped.
    WouldBlock,
    /// The sink was closed before the send.
    Closed,
    Io(std::io::Error),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WouldBlock => write!(f, "send would block; datagram dropped"),
            Self::Closed => write!(f, "transport closed"),
            Self::Io(err) => write!(f, "transport i/o error: {}", err),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::WouldBlock {
            Self::WouldBlock
        } else {
            Self::Io(err)
        }
    }
}

/// Outbound command link to the actuator.
pub trait CommandSink {
    /// Sink identifier for logs.
    fn name(&self) -> &'static str;

    /// Hand `bytes` to the link without blocking for delivery.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }
}
