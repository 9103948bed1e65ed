use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{CommandSink, TransportError};
use crate::command::Command;

/// Dry-run sink: logs each command instead of transmitting it.
///
/// Used for offline replay of recorded tracker output.
#[derive(Debug, Default)]
pub struct LogSink {
    sent: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl CommandSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.sent += 1;
        let decoded = bytes.first().copied().and_then(Command::from_byte);
        match decoded {
            Some(cmd) => log::info!("dry-run command #{}: {} ({:?})", self.sent, cmd, cmd),
            None => log::info!("dry-run payload #{}: {:?}", self.sent, bytes),
        }
        Ok(())
    }
}

/// In-memory sink that records every payload.
///
/// Clones share the same buffer, so a test can keep a handle while the
/// engine owns the sink.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    failures_left: Arc<AtomicU64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose sends always fail with `WouldBlock` (nothing recorded).
    pub fn failing() -> Self {
        Self::failing_times(u64::MAX)
    }

    /// A sink whose first send fails with `WouldBlock`; later sends succeed.
    pub fn failing_once() -> Self {
        Self::failing_times(1)
    }

    fn failing_times(count: u64) -> Self {
        Self {
            failures_left: Arc::new(AtomicU64::new(count)),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Recorded payloads decoded as commands; undecodable payloads are skipped.
    pub fn commands(&self) -> Vec<Command> {
        self.writes()
            .iter()
            .filter_map(|bytes| bytes.first().copied().and_then(Command::from_byte))
            .collect()
    }
}

impl CommandSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                u64::MAX => Some(u64::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if failed {
            return Err(TransportError::WouldBlock);
        }
        let mut writes = self.writes.lock().map_err(|_| TransportError::Closed)?;
        writes.push(bytes.to_vec());
        Ok(())
    }
}
