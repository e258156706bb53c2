use kernel_memory_addresses::PhysicalAddress;

/// Response to a memory map request.
#[repr(C)]
#[derive(Debug)]
pub struct MemoryMapResponse {
    /// The revision of the response structure.
    pub revision: u64,
    /// How many entries are present.
    pub entry_count: u64,
    /// Pointer to an array of `entry_count` entry pointers.
    pub entries: *const *const MemoryMapEntry,
}

/// One region of the physical address space.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MemoryMapEntry {
    /// Physical start of the region.
    pub base: u64,
    /// Size in bytes.
    pub length: u64,
    /// Usage of the region.
    pub kind: MemoryMapEntryType,
}

impl MemoryMapEntry {
    #[must_use]
    pub const fn new(base: u64, length: u64, kind: MemoryMapEntryType) -> Self {
        Self { base, length, kind }
    }

    #[must_use]
    pub const fn start(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.base)
    }

    /// Exclusive end of the region, or `None` if it wraps the address space.
    #[must_use]
    pub const fn end(&self) -> Option<PhysicalAddress> {
        self.start().checked_add(self.length)
    }
}

/// Raw memory region type tag.
///
/// Kept as an open newtype: newer bootloaders may report tags this kernel has
/// never heard of.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MemoryMapEntryType(pub u64);

impl MemoryMapEntryType {
    /// Free for general use.
    pub const USABLE: Self = Self(0);
    /// Reserved by firmware or hardware.
    pub const RESERVED: Self = Self(1);
    /// Holds ACPI tables; reusable once they have been parsed.
    pub const ACPI_RECLAIMABLE: Self = Self(2);
    /// ACPI non-volatile storage.
    pub const ACPI_NVS: Self = Self(3);
    /// Faulty RAM.
    pub const BAD_MEMORY: Self = Self(4);
    /// Holds bootloader structures, including every response record.
    pub const BOOTLOADER_RECLAIMABLE: Self = Self(5);
    /// The kernel image and loaded modules.
    pub const EXECUTABLE_AND_MODULES: Self = Self(6);
    /// The linear framebuffer.
    pub const FRAMEBUFFER: Self = Self(7);
    /// ACPI tables that must stay mapped.
    pub const ACPI_TABLES: Self = Self(8);
}
