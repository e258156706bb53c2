//! # Physical memory map
//!
//! The bootloader describes physical memory as an array of pointers to
//! `{ base, length, type }` entries. Validation borrows that array in place;
//! adaptation copies it into a fixed-capacity [`MemoryMap`] the physical
//! allocator can own.

use crate::error::{Malformation, ValidationError};
use crate::window::ResponseWindow;
use kernel_info::protocol::{MemoryMapEntry, MemoryMapEntryType, MemoryMapResponse};
use kernel_memory_addresses::PhysicalAddress;
use utils_accessors_derive::Getters;

/// Most regions a memory map may describe.
///
/// Firmware memory maps on real machines rarely exceed a few dozen entries.
pub const MAX_MEMORY_REGIONS: usize = 256;

/// A validated memory map, still living in bootloader memory.
///
/// Entries are non-null, sorted by base address and pairwise disjoint.
#[derive(Debug, Copy, Clone)]
pub struct MemoryMapView<'w> {
    entries: &'w [&'w MemoryMapEntry],
}

impl<'w> MemoryMapView<'w> {
    pub(crate) fn inspect(
        window: &'w ResponseWindow,
        response: &'w MemoryMapResponse,
    ) -> Result<Self, ValidationError> {
        if response.entry_count == 0 {
            return Err(Malformation::EmptyMemoryMap.into());
        }
        if response.entries.is_null() {
            return Err(Malformation::NullEntryArray.into());
        }
        let count = usize::try_from(response.entry_count)
            .ok()
            .filter(|&count| count <= MAX_MEMORY_REGIONS)
            .ok_or(Malformation::TooManyRegions(response.entry_count))?;

        // SAFETY: the array is non-null and holds `entry_count` pointers
        // covered by the window.
        let pointers = unsafe { window.borrow_slice(response.entries, count) };
        if let Some(index) = pointers.iter().position(|entry| entry.is_null()) {
            return Err(Malformation::NullEntry { index }.into());
        }

        // SAFETY: every pointer is non-null and covered by the window;
        // `&T` and `*const T` share their layout.
        let entries =
            unsafe { window.borrow_slice(pointers.as_ptr().cast::<&MemoryMapEntry>(), count) };
        Self::check(entries)?;
        Ok(Self { entries })
    }

    fn check(entries: &[&MemoryMapEntry]) -> Result<(), Malformation> {
        let mut previous: Option<(PhysicalAddress, PhysicalAddress)> = None;
        for (index, entry) in entries.iter().enumerate() {
            let start = entry.start();
            let end = entry.end().ok_or(Malformation::RegionOverflow { index })?;
            if let Some((previous_start, previous_end)) = previous {
                if start < previous_start {
                    return Err(Malformation::UnsortedRegions { index });
                }
                if start < previous_end {
                    return Err(Malformation::OverlappingRegions { index });
                }
            }
            previous = Some((start, end));
        }
        Ok(())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> core::iter::Copied<core::slice::Iter<'w, &'w MemoryMapEntry>> {
        self.entries.iter().copied()
    }
}

/// The kind of memory a region describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MemoryRegionKind {
    /// Free RAM.
    Usable,
    Reserved,
    /// ACPI tables that may be reclaimed once parsed.
    AcpiReclaimable,
    /// ACPI non-volatile storage; never reclaimable.
    AcpiNvs,
    BadMemory,
    /// Bootloader data, including the responses themselves. Reclaimable
    /// once the response window is closed.
    BootloaderReclaimable,
    /// The kernel image and loaded modules.
    ExecutableAndModules,
    Framebuffer,
    AcpiTables,
    /// A type this kernel does not know; treated like reserved memory.
    Unknown(u64),
}

impl From<MemoryMapEntryType> for MemoryRegionKind {
    fn from(kind: MemoryMapEntryType) -> Self {
        match kind {
            MemoryMapEntryType::USABLE => Self::Usable,
            MemoryMapEntryType::RESERVED => Self::Reserved,
            MemoryMapEntryType::ACPI_RECLAIMABLE => Self::AcpiReclaimable,
            MemoryMapEntryType::ACPI_NVS => Self::AcpiNvs,
            MemoryMapEntryType::BAD_MEMORY => Self::BadMemory,
            MemoryMapEntryType::BOOTLOADER_RECLAIMABLE => Self::BootloaderReclaimable,
            MemoryMapEntryType::EXECUTABLE_AND_MODULES => Self::ExecutableAndModules,
            MemoryMapEntryType::FRAMEBUFFER => Self::Framebuffer,
            MemoryMapEntryType::ACPI_TABLES => Self::AcpiTables,
            MemoryMapEntryType(other) => Self::Unknown(other),
        }
    }
}

/// One contiguous range of physical memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Getters)]
pub struct MemoryRegion {
    #[getters(copy)]
    base: PhysicalAddress,
    /// Length in bytes.
    #[getters(copy)]
    length: u64,
    #[getters(copy)]
    kind: MemoryRegionKind,
}

impl MemoryRegion {
    #[must_use]
    pub const fn new(base: PhysicalAddress, length: u64, kind: MemoryRegionKind) -> Self {
        Self { base, length, kind }
    }

    /// One past the last byte, if representable.
    #[must_use]
    pub const fn end(&self) -> Option<PhysicalAddress> {
        self.base.checked_add(self.length)
    }
}

impl From<&MemoryMapEntry> for MemoryRegion {
    fn from(entry: &MemoryMapEntry) -> Self {
        Self::new(entry.start(), entry.length, entry.kind.into())
    }
}

/// The physical memory map, copied out of bootloader memory.
///
/// Regions keep the bootloader's order: sorted by base, non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoryMap {
    regions: heapless::Vec<MemoryRegion, MAX_MEMORY_REGIONS>,
}

impl MemoryMap {
    pub(crate) fn from_view(view: &MemoryMapView<'_>) -> Self {
        let mut regions = heapless::Vec::new();
        for entry in view.iter() {
            // Capacity was checked during validation.
            if regions.push(MemoryRegion::from(entry)).is_err() {
                break;
            }
        }
        Self { regions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MemoryRegion] {
        &self.regions
    }

    #[must_use]
    pub fn iter(&self) -> core::slice::Iter<'_, MemoryRegion> {
        self.regions.iter()
    }

    /// All regions of the given kind, in address order.
    #[must_use]
    pub fn iter_kind(&self, kind: MemoryRegionKind) -> impl Iterator<Item = &MemoryRegion> + '_ {
        self.regions.iter().filter(move |region| region.kind == kind)
    }

    /// Total bytes of [`MemoryRegionKind::Usable`] memory.
    #[must_use]
    pub fn usable_bytes(&self) -> u64 {
        self.iter_kind(MemoryRegionKind::Usable)
            .fold(0, |total, region| total.saturating_add(region.length))
    }
}

impl<'a> IntoIterator for &'a MemoryMap {
    type Item = &'a MemoryRegion;
    type IntoIter = core::slice::Iter<'a, MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn entry(base: u64, length: u64) -> MemoryMapEntry {
        MemoryMapEntry::new(base, length, MemoryMapEntryType::USABLE)
    }

    #[test]
    fn sorted_disjoint_regions_pass() {
        let a = entry(0x1000, 0x1000);
        let b = entry(0x2000, 0x1000);
        let c = entry(0x10_0000, 0x10_0000);
        assert_eq!(MemoryMapView::check(&[&a, &b, &c]), Ok(()));
    }

    #[test]
    fn overlap_is_reported_at_the_later_entry() {
        let a = entry(0x1000, 0x2000);
        let b = entry(0x2000, 0x1000);
        assert_eq!(
            MemoryMapView::check(&[&a, &b]),
            Err(Malformation::OverlappingRegions { index: 1 })
        );
    }

    #[test]
    fn unsorted_regions_are_rejected() {
        let a = entry(0x8000, 0x1000);
        let b = entry(0x1000, 0x1000);
        assert_eq!(
            MemoryMapView::check(&[&a, &b]),
            Err(Malformation::UnsortedRegions { index: 1 })
        );
    }

    #[test]
    fn wrapping_region_is_rejected() {
        let a = entry(u64::MAX - 0xfff, 0x2000);
        assert_eq!(
            MemoryMapView::check(&[&a]),
            Err(Malformation::RegionOverflow { index: 0 })
        );
    }

    #[test]
    fn unknown_types_are_preserved() {
        assert_eq!(
            MemoryRegionKind::from(MemoryMapEntryType(0x1234)),
            MemoryRegionKind::Unknown(0x1234)
        );
        assert_eq!(
            MemoryRegionKind::from(MemoryMapEntryType::BOOTLOADER_RECLAIMABLE),
            MemoryRegionKind::BootloaderReclaimable
        );
    }

    #[test]
    fn usable_bytes_ignores_other_kinds() {
        let mut regions = heapless::Vec::new();
        for region in [
            MemoryRegion::new(PhysicalAddress::new(0), 0x1000, MemoryRegionKind::Reserved),
            MemoryRegion::new(PhysicalAddress::new(0x1000), 0x9000, MemoryRegionKind::Usable),
            MemoryRegion::new(PhysicalAddress::new(0x10_0000), 0x1000, MemoryRegionKind::AcpiNvs),
            MemoryRegion::new(PhysicalAddress::new(0x20_0000), 0x1000, MemoryRegionKind::Usable),
        ] {
            regions.push(region).unwrap();
        }
        let map = MemoryMap { regions };

        assert_eq!(map.usable_bytes(), 0xa000);
        assert_eq!(map.iter_kind(MemoryRegionKind::Usable).count(), 2);
        assert_eq!(map.as_slice()[2].kind(), MemoryRegionKind::AcpiNvs);
    }
}
