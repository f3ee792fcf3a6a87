//! Report destinations and the emit operation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ProfgateResult, WriteMode};

/// Where reports go. Resolved once at construction; `emit` dispatches over
/// the variant.
#[derive(Clone)]
pub enum Destination {
    Stdout,
    /// A shared open stream. The mutex serializes concurrent emits when the
    /// handle is shared across wrappers or threads.
    Stream(Arc<Mutex<dyn Write + Send>>),
    /// A filesystem path, opened under the configured mode for the duration
    /// of one emit and closed afterwards.
    Path(PathBuf),
}

impl Destination {
    pub fn stream(writer: impl Write + Send + 'static) -> Self {
        Self::Stream(Arc::new(Mutex::new(writer)))
    }

    /// Wraps an already-shared handle, letting the caller keep a typed
    /// clone for inspection.
    pub fn shared<W: Write + Send + 'static>(handle: Arc<Mutex<W>>) -> Self {
        Self::Stream(handle)
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
        }
    }
}

/// A destination plus its write mode. Each emit is a self-contained write:
/// a `Profiling <label>()` header line, then the report body.
#[derive(Debug, Clone)]
pub struct ReportSink {
    destination: Destination,
    mode: WriteMode,
}

impl ReportSink {
    pub fn new(destination: Destination, mode: WriteMode) -> Self {
        Self { destination, mode }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn emit(&self, label: &str, body: &str) -> ProfgateResult<()> {
        match &self.destination {
            Destination::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                write_block(&mut handle, label, body)?;
            }
            Destination::Stream(stream) => {
                let mut guard = stream.lock().unwrap_or_else(PoisonError::into_inner);
                write_block(&mut *guard, label, body)?;
            }
            Destination::Path(path) => {
                let mut file = open_for_mode(path, self.mode)?;
                write_block(&mut file, label, body)?;
            }
        }
        Ok(())
    }
}

fn write_block<W: Write + ?Sized>(writer: &mut W, label: &str, body: &str) -> std::io::Result<()> {
    writer.write_all(format!("Profiling {label}()\n").as_bytes())?;
    writer.write_all(body.as_bytes())?;
    writer.flush()
}

fn open_for_mode(path: &Path, mode: WriteMode) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.create(true).write(true);
    if mode.truncates() {
        options.truncate(true);
    } else {
        options.append(true);
    }
    options.open(path)
}
