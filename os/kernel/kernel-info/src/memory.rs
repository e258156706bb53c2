//! # Memory Layout

/// Where the kernel executes (VMA), matches the linker script.
///
/// The boot protocol requires the kernel image to live in the top 2 GiB of
/// the address space.
///
/// # Kernel Build
/// This information is sourced in the kernel's `build.rs` to configure
/// the linker.
pub const KERNEL_BASE: u64 = 0xffff_ffff_8000_0000;

/// Stack size the kernel runs its negotiation on.
///
/// The bootloader provides at least 64 KiB of stack at entry.
pub const KERNEL_STACK_SIZE: usize = 64 * 1024;

const _: () = {
    assert!(KERNEL_STACK_SIZE.is_multiple_of(4096));
    assert!(KERNEL_BASE.is_multiple_of(2 * 1024 * 1024));
    assert!(KERNEL_BASE >= 0xffff_ffff_8000_0000);
};
