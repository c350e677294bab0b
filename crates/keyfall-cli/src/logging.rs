//! Logging setup.
//!
//! Log lines go to stderr, which shares the tty with the game screen. While
//! a session owns the terminal, lines are held in memory and written out once
//! the screen has been restored.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Default)]
struct Pending {
    held: bool,
    bytes: Vec<u8>,
}

/// stderr writer that can hold output back.
#[derive(Debug, Clone, Default)]
pub struct DeferredStderr {
    pending: Arc<Mutex<Pending>>,
}

impl DeferredStderr {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Hold log output until the returned guard is dropped.
    pub fn hold(&self) -> HeldLogs {
        self.pending().held = true;
        HeldLogs(self.clone())
    }

    fn release(&self) -> io::Result<()> {
        let mut pending = self.pending();
        pending.held = false;
        let bytes = std::mem::take(&mut pending.bytes);
        if bytes.is_empty() {
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        stderr.write_all(&bytes)?;
        stderr.flush()
    }
}

impl Write for DeferredStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut pending = self.pending();
        if pending.held {
            pending.bytes.extend_from_slice(buf);
            return Ok(buf.len());
        }
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending().held {
            return Ok(());
        }
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for DeferredStderr {
    type Writer = DeferredStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Writes held log lines out when dropped.
pub struct HeldLogs(DeferredStderr);

impl Drop for HeldLogs {
    fn drop(&mut self) {
        // Nowhere left to report a failing stderr.
        let _ = self.0.release();
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the quiet default.
pub fn init_logging() -> DeferredStderr {
    let writer = DeferredStderr::default();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keyfall=warn,keyfall_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer.clone())
        .init();
    writer
}
