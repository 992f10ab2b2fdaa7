use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;

const MAX_BUFFERED_LINES: usize = 512;

/// Shared in-memory sink for log lines while the terminal is in raw mode.
/// Hosts render its tail wherever they like.
#[derive(Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        match self.inner.lock() {
            Ok(lines) => {
                let skip = lines.len().saturating_sub(count);
                lines[skip..].to_vec()
            }
            Err(_) => Vec::new(),
        }
    }

    fn push_bytes(&self, buf: &[u8]) {
        if let Ok(mut lines) = self.inner.lock() {
            for line in String::from_utf8_lossy(buf).lines() {
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
            }
            let len = lines.len();
            if len > MAX_BUFFERED_LINES {
                lines.drain(..len - MAX_BUFFERED_LINES);
            }
        }
    }
}

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Install the buffer the formatter writes into. The first caller wins;
/// the buffer actually in effect is returned.
pub fn install_log_buffer(buffer: LogBuffer) -> LogBuffer {
    GLOBAL_BUFFER.get_or_init(|| buffer).clone()
}

fn global_log_buffer() -> Option<LogBuffer> {
    GLOBAL_BUFFER.get().cloned()
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Buffer(LogBuffer),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new() -> Self {
        if let Some(buffer) = global_log_buffer() {
            DelegatingWriter {
                inner: DelegatingInner::Buffer(buffer),
            }
        } else {
            DelegatingWriter {
                inner: DelegatingInner::Stderr(io::stderr()),
            }
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Buffer(b) => {
                b.push_bytes(buf);
                Ok(buf.len())
            }
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Buffer(_) => Ok(()),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Initialize tracing subscriber to write into the installed log buffer when
/// available, otherwise fall back to stderr. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber.
pub fn init(max_level: Level) {
    // Plain text only: buffered lines end up inside the TUI.
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
}

pub fn init_default() {
    init(Level::DEBUG);
}
