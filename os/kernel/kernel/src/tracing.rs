//! # Kernel Tracing helpers

use kernel_boot::{BootInfo, FramebufferState, MemoryRegionKind, PixelFormat};
use log::{debug, info};

pub fn trace_boot_info(boot_info: &BootInfo) {
    let memory_map = boot_info.memory_map();
    info!(
        concat!(
            "Boot Info in Kernel:\n",
            "  revision = {revision}\n",
            "  MMAP     = {regions} regions, {usable} usable bytes\n",
            "  HHDM     = {hhdm}"
        ),
        revision = boot_info.revision(),
        regions = memory_map.len(),
        usable = memory_map.usable_bytes(),
        hhdm = boot_info.direct_map(),
    );

    match boot_info.framebuffer() {
        FramebufferState::Available(fb) => info!(
            "  FB       = {va} ({pa}), {width}x{height}, pitch = {pitch}, bpp = {bpp}, format = {fmt}",
            va = fb.address(),
            pa = fb.physical(),
            width = fb.width(),
            height = fb.height(),
            pitch = fb.pitch(),
            bpp = fb.bits_per_pixel(),
            fmt = match fb.format() {
                PixelFormat::Rgb => "RGB",
                PixelFormat::Bgr => "BGR",
                PixelFormat::Bitmask => "Bitmask",
            },
        ),
        FramebufferState::Absent => info!("  FB       = absent (headless)"),
    }

    for region in memory_map {
        debug!(
            "  {base} +{length:#x} {kind}",
            base = region.base(),
            length = region.length(),
            kind = kind_name(region.kind()),
        );
    }
}

const fn kind_name(kind: MemoryRegionKind) -> &'static str {
    match kind {
        MemoryRegionKind::Usable => "usable",
        MemoryRegionKind::Reserved => "reserved",
        MemoryRegionKind::AcpiReclaimable => "ACPI reclaimable",
        MemoryRegionKind::AcpiNvs => "ACPI NVS",
        MemoryRegionKind::BadMemory => "bad memory",
        MemoryRegionKind::BootloaderReclaimable => "bootloader reclaimable",
        MemoryRegionKind::ExecutableAndModules => "executable and modules",
        MemoryRegionKind::Framebuffer => "framebuffer",
        MemoryRegionKind::AcpiTables => "ACPI tables",
        MemoryRegionKind::Unknown(_) => "unknown",
    }
}
