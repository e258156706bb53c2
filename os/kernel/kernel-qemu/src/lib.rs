//! # QEMU Debug Console Logging
//!
//! A `log` backend for the earliest phase of boot, before any console driver
//! exists. Log records are formatted without allocation and written byte by
//! byte to a [`ByteSink`].
//!
//! ## Overview
//!
//! At kernel entry the only diagnostic channel that is guaranteed to work is
//! an I/O port: QEMU's debug console (`-debugcon`) captures every byte written
//! to port `0x402` and forwards it to the host. [`DebugPort`] is that sink;
//! [`SinkLogger`] turns it into a [`log::Log`] implementation so the rest of
//! the kernel can use the ordinary `log` macros.
//!
//! ```text
//! info!(...) → SinkLogger::log → SinkWriter (fmt::Write) → ByteSink → port 0x402
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kernel_qemu::QemuLogger;
//! use log::{LevelFilter, info};
//!
//! static LOGGER: QemuLogger = QemuLogger::qemu(LevelFilter::Debug);
//!
//! kernel_qemu::init(&LOGGER).expect("logger initialization");
//! info!("Negotiating with the bootloader");
//! ```
//!
//! Host side:
//! ```bash
//! qemu-system-x86_64 -cdrom os.iso -debugcon stdio
//! ```
//!
//! ## Feature System
//!
//! With the `enabled` feature (default) [`DebugPort`] performs real port
//! writes. Without it every write is a no-op, which keeps release images from
//! poking an I/O port that may belong to real hardware.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;
mod port;

pub use logger::{QemuLogger, SinkLogger, SinkWriter, init};
pub use port::DebugPort;

/// A destination for raw log bytes.
///
/// Implementations must be usable from a shared reference because
/// `log::Log::log` only receives `&self`.
pub trait ByteSink: Sync + Send {
    fn write_bytes(&self, bytes: &[u8]);
}

impl<S: ByteSink + ?Sized> ByteSink for &S {
    fn write_bytes(&self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

/// Write formatted text straight to the QEMU debug port, bypassing `log`.
///
/// Useful before the logger is installed, e.g. to prove the entry point ran.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        // No allocation: `format_args!` builds a lightweight `Arguments`.
        let mut writer = $crate::SinkWriter::new($crate::DebugPort);
        let _ = core::fmt::Write::write_fmt(&mut writer, core::format_args!($($arg)*));
    }};
}
