//! # Physical and Virtual Memory Address Types
//!
//! Strongly typed wrappers for the raw addresses exchanged with the bootloader.
//!
//! ## Overview
//!
//! The boot protocol hands the kernel a mix of physical addresses (memory map
//! entries) and virtual addresses (framebuffer base, response pointers), all of
//! them plain `u64` values on the wire. Mixing them up is the classic early-boot
//! bug, so this crate gives each space its own zero-cost type:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`PhysicalAddress`] | Host RAM or MMIO, as listed in the memory map. |
//! | [`VirtualAddress`] | Translated through the active page tables. |
//! | [`DirectMapOffset`] | The HHDM offset linking the two. |
//!
//! ## Direct Map
//!
//! The bootloader maps all physical memory at a fixed offset in the higher
//! half. [`DirectMapOffset`] converts between the two spaces with checked
//! arithmetic; a conversion that would wrap returns `None` instead of a
//! bogus address.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let hhdm = DirectMapOffset::new(0xffff_8000_0000_0000);
//! let pa = PhysicalAddress::new(0x1000);
//! let va = hhdm.phys_to_virt(pa).unwrap();
//! assert_eq!(va.as_u64(), 0xffff_8000_0000_1000);
//! assert_eq!(hhdm.virt_to_phys(va), Some(pa));
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod direct_map;
mod physical_address;
mod virtual_address;

pub use direct_map::DirectMapOffset;
pub use physical_address::PhysicalAddress;
pub use virtual_address::VirtualAddress;

/// Size of the base page on x86-64.
pub const PAGE_SIZE: u64 = 4096;

/// Returns `true` if `value` is a multiple of [`PAGE_SIZE`].
#[inline]
#[must_use]
pub const fn is_page_aligned(value: u64) -> bool {
    value & (PAGE_SIZE - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_alignment() {
        assert!(is_page_aligned(0));
        assert!(is_page_aligned(0x1000));
        assert!(is_page_aligned(0xffff_8000_0000_0000));
        assert!(!is_page_aligned(0x1001));
        assert!(!is_page_aligned(0x800));
    }

    #[test]
    fn addresses_do_not_mix() {
        let pa = PhysicalAddress::new(0x20_0000);
        let va = VirtualAddress::new(0x20_0000);
        assert_eq!(pa.as_u64(), va.as_u64());
        assert_eq!(format!("{pa:?}"), "PA(0x0000000000200000)");
        assert_eq!(format!("{va:?}"), "VA(0x0000000000200000)");
    }
}
