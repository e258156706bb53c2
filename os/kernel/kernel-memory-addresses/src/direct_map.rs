use crate::{PhysicalAddress, VirtualAddress};
use core::fmt;

/// Offset of the Higher Half Direct Map (HHDM).
///
/// `physical + offset` yields the virtual address at which the bootloader
/// mapped that physical byte. The offset is fixed for the whole boot session;
/// it is only meaningful until the kernel installs page tables of its own that
/// drop the direct map.
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let hhdm = DirectMapOffset::new(0xffff_8000_0000_0000);
/// assert!(hhdm.is_higher_half());
/// assert!(hhdm.is_page_aligned());
/// // Addresses below the offset are not part of the direct map.
/// assert_eq!(hhdm.virt_to_phys(VirtualAddress::new(0x1000)), None);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DirectMapOffset(u64);

impl DirectMapOffset {
    #[inline]
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The virtual address of physical address zero.
    #[inline]
    #[must_use]
    pub const fn base(self) -> VirtualAddress {
        VirtualAddress::new(self.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_higher_half(self) -> bool {
        self.base().is_higher_half()
    }

    #[inline]
    #[must_use]
    pub const fn is_page_aligned(self) -> bool {
        crate::is_page_aligned(self.0)
    }

    /// Virtual alias of `pa` inside the direct map.
    #[inline]
    #[must_use]
    pub const fn phys_to_virt(self, pa: PhysicalAddress) -> Option<VirtualAddress> {
        match pa.as_u64().checked_add(self.0) {
            Some(va) => Some(VirtualAddress::new(va)),
            None => None,
        }
    }

    /// Physical address behind `va`, if `va` lies inside the direct map.
    #[inline]
    #[must_use]
    pub const fn virt_to_phys(self, va: VirtualAddress) -> Option<PhysicalAddress> {
        match va.as_u64().checked_sub(self.0) {
            Some(pa) => Some(PhysicalAddress::new(pa)),
            None => None,
        }
    }
}

impl fmt::Debug for DirectMapOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HHDM(0x{:016X})", self.0)
    }
}

impl fmt::Display for DirectMapOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}
