//! # Boot info adapter
//!
//! Copies validated responses out of bootloader memory into [`BootInfo`], the
//! immutable snapshot later subsystems consume. Nothing in a `BootInfo`
//! points into bootloader-owned memory, so it stays valid after the response
//! window is closed and bootloader-reclaimable memory is handed to the
//! allocator.

use crate::framebuffer::FramebufferState;
use crate::memory_map::MemoryMap;
use crate::table::ValidatedResponses;
use kernel_memory_addresses::DirectMapOffset;
use utils_accessors_derive::Getters;

/// Everything the kernel learned from the bootloader.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BootInfo {
    /// The revision word the bootloader left in the marker; see
    /// [`negotiate`](crate::negotiate) for how it is interpreted.
    #[getters(copy)]
    revision: u64,
    /// Physical memory, sorted by base address.
    memory_map: MemoryMap,
    framebuffer: FramebufferState,
    /// Offset of the bootloader's higher-half direct map.
    #[getters(copy)]
    direct_map: DirectMapOffset,
}

/// Converts validated responses into a [`BootInfo`].
///
/// Pure: the same responses always produce equal snapshots.
#[must_use]
pub fn adapt(responses: &ValidatedResponses<'_>) -> BootInfo {
    BootInfo {
        revision: responses.revision(),
        memory_map: MemoryMap::from_view(&responses.memory_map()),
        framebuffer: responses
            .framebuffer()
            .map_or(FramebufferState::Absent, FramebufferState::Available),
        direct_map: responses.direct_map(),
    }
}
