use crate::{ByteSink, DebugPort};
use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `core::fmt::Write` adapter over a [`ByteSink`].
pub struct SinkWriter<S> {
    sink: S,
}

impl<S: ByteSink> SinkWriter<S> {
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: ByteSink> Write for SinkWriter<S> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// A [`Log`] implementation writing one line per record to a [`ByteSink`].
///
/// Format: `"[LEVEL] target: message\n"`.
pub struct SinkLogger<S> {
    sink: S,
    max_level: LevelFilter,
}

/// The logger used by the kernel: a [`SinkLogger`] over the QEMU debug port.
pub type QemuLogger = SinkLogger<DebugPort>;

impl QemuLogger {
    #[must_use]
    pub const fn qemu(max_level: LevelFilter) -> Self {
        Self::new(DebugPort, max_level)
    }
}

impl<S: ByteSink> SinkLogger<S> {
    #[must_use]
    pub const fn new(sink: S, max_level: LevelFilter) -> Self {
        Self { sink, max_level }
    }

    #[must_use]
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ByteSink> Log for SinkLogger<S> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Ignore errors; this is best-effort debug output.
        let mut writer = SinkWriter::new(&self.sink);
        let _ = writeln!(
            writer,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        // no buffering
    }
}

/// Install `logger` as the global logger.
///
/// Call this once during early init. The logger lives in a `static`, so no
/// allocation is needed.
///
/// # Errors
/// Fails if a logger was already installed.
pub fn init<S: ByteSink + 'static>(logger: &'static SinkLogger<S>) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.max_level);
    Ok(())
}
