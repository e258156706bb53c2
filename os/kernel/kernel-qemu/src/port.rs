use crate::ByteSink;

/// The port number of QEMU's debug console.
const QEMU_DEBUG_PORT: u16 = 0x402;

/// QEMU's debug console port.
#[derive(Debug, Copy, Clone, Default)]
pub struct DebugPort;

impl ByteSink for DebugPort {
    #[inline]
    fn write_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            putc(b);
        }
    }
}

#[cfg(all(feature = "enabled", target_arch = "x86_64"))]
#[allow(clippy::inline_always)]
#[inline(always)]
fn putc(c: u8) {
    // SAFETY: writing the debug port has no memory effects; on real hardware
    // the port is unused.
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") QEMU_DEBUG_PORT,
            in("al") c,
            options(nomem, nostack, preserves_flags)
        );
    }
}

#[cfg(not(all(feature = "enabled", target_arch = "x86_64")))]
#[inline]
fn putc(_c: u8) {
    // no-op when the port is disabled or absent
    let _ = QEMU_DEBUG_PORT;
}
