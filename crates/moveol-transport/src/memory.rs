//! ---
//! ems_section: "02-transport"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Byte sinks for telemetry lines."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Transport, TransportError};

/// In-memory transport. Clones share the same buffer, so a test can keep a
/// handle while the transmitter owns another.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    name: String,
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    written: Vec<u8>,
    writes: usize,
    fail_after: Option<usize>,
}

impl MemoryTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(MemoryInner::default())),
        }
    }

    /// Accept `writes` successful writes, then fail every following one with
    /// `BrokenPipe`, as a dropped bluetooth link would.
    pub fn fail_after(self, writes: usize) -> Self {
        self.inner.lock().fail_after = Some(writes);
        self
    }

    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }

    /// Written bytes split on `\n`, terminators removed.
    pub fn lines(&self) -> Vec<String> {
        let inner = self.inner.lock();
        String::from_utf8_lossy(&inner.written)
            .split_terminator('\n')
            .map(str::to_owned)
            .collect()
    }

    /// Number of successful `send` calls.
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

impl Transport for MemoryTransport {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if inner.fail_after.is_some_and(|limit| inner.writes >= limit) {
            return Err(TransportError::Write {
                port: self.name.clone(),
                source: io::Error::new(io::ErrorKind::BrokenPipe, "link dropped"),
            });
        }
        inner.written.extend_from_slice(payload);
        inner.writes += 1;
        Ok(())
    }
}
