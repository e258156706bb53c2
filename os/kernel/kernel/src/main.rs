//! # Kernel Entry Point

#![no_std]
#![no_main]
#![allow(unsafe_code)]

mod framebuffer;
mod requests;
mod tracing;

use crate::framebuffer::fill_solid;
use crate::tracing::trace_boot_info;
use kernel_boot::{BootError, BootInfo, NegotiationConfig, ResponseWindow, boot_info, validate};
use kernel_info::memory::KERNEL_STACK_SIZE;
use kernel_qemu::QemuLogger;
use kernel_sync::FreezeCell;
use log::{LevelFilter, error, info};

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::Info;

static LOGGER: QemuLogger = QemuLogger::qemu(LOG_LEVEL);

/// The boot information, frozen once negotiation succeeded.
pub static BOOT_INFO: FreezeCell<BootInfo> = FreezeCell::new();

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    error!("{info}");
    halt()
}

/// 16-byte aligned stack
#[repr(align(16))]
struct Aligned<const N: usize>([u8; N]);

#[unsafe(link_section = ".bss.boot")]
#[unsafe(no_mangle)]
static mut BOOT_STACK: Aligned<KERNEL_STACK_SIZE> = Aligned([0; KERNEL_STACK_SIZE]);

/// The kernel entry point
///
/// # Bootloader Interaction
/// The bootloader jumps here after filling in the responses of the request
/// section. No arguments are passed; everything the kernel learns comes from
/// the response pointers.
///
/// # Naked function & Stack
/// This is a naked function in order to switch to a stack the kernel owns
/// before any Rust code runs. Without the `naked` attribute (and the
/// [`naked_asm`](core::arch::naked_asm) instruction), the compiler would
/// emit a prologue on the bootloader's stack.
#[unsafe(no_mangle)]
#[unsafe(naked)]
pub extern "C" fn _start_kernel() -> ! {
    core::arch::naked_asm!(
        "cli",

        // Build our own kernel stack and establish a valid call frame for kernel_entry
        "lea rax, [rip + {stack_sym}]",
        "add rax, {stack_size}",
        // Align down to 16
        "and rax, -16",
        // Set RSP to the prepared value
        "mov rsp, rax",
        // Emulate a CALL by pushing a dummy return address (so RSP % 16 == 8 at entry)
        "push 0",
        "xor rbp, rbp",

        // Jump to Rust entry and never return
        "jmp {rust_entry}",
        stack_sym = sym BOOT_STACK,
        stack_size = const KERNEL_STACK_SIZE,
        rust_entry = sym kernel_entry,
    );
}

/// Kernel entry running on the kernel's own stack.
#[unsafe(no_mangle)]
extern "C" fn kernel_entry() -> ! {
    #[cfg(feature = "qemu")]
    kernel_qemu::qemu_trace!("Kernel reporting to QEMU!\n");

    if kernel_qemu::init(&LOGGER).is_err() {
        kernel_qemu::qemu_trace!("A logger was already installed; keeping it\n");
    }

    // SAFETY: the bootloader filled the request section before jumping here
    // and its memory stays untouched until the window is closed.
    let window = unsafe { ResponseWindow::open() };
    let result = boot_info(&window, &requests::table(), &NegotiationConfig::DEFAULT);

    match result {
        Ok(info) => {
            window.close();
            kernel_main(info)
        }
        Err(err) => fatal(&window, err),
    }
}

fn kernel_main(info: BootInfo) -> ! {
    let Ok(info) = BOOT_INFO.freeze(info) else {
        error!("Boot information was already frozen");
        halt()
    };
    trace_boot_info(info);
    info!("Boot negotiation complete; entering idle loop");

    loop {
        // SAFETY: interrupts are not set up; `hlt` only idles the CPU.
        unsafe { core::arch::asm!("hlt", options(nomem, nostack)) };
    }
}

/// Reports a fatal boot error on every available channel and halts.
fn fatal(window: &ResponseWindow, err: BootError) -> ! {
    error!("Fatal boot error: {err}");

    if !err.responses_readable() {
        halt()
    }

    // The framebuffer may still be usable even if negotiation failed elsewhere.
    if let Ok(fb) = validate(window, requests::table().framebuffer) {
        // SAFETY: the bootloader maps the framebuffer it reports.
        unsafe { fill_solid(&fb, 0xff, 0, 0) };
    }

    halt()
}

fn halt() -> ! {
    loop {
        // SAFETY: stops the CPU; nothing runs afterwards.
        unsafe { core::arch::asm!("cli", "hlt", options(nomem, nostack)) };
    }
}
