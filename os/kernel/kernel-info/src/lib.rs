//! # Kernel Boot Protocol Interface
//!
//! This crate defines the binary contract between the kernel and its
//! bootloader: the records the kernel publishes before boot and the layouts
//! of the answers the bootloader writes back. It also carries the memory
//! layout constants the kernel's linker script is generated from.
//!
//! ## Overview
//!
//! The kernel speaks the [Limine boot protocol]: instead of receiving a boot
//! information pointer as an argument, the kernel places fixed-layout
//! *request* records into a dedicated section of its image. The bootloader
//! scans that section, recognizes each record by its 256-bit identifier and
//! stores a pointer to a *response* into the record before jumping to the
//! kernel entry point.
//!
//! ```text
//!  .requests_start_marker   [ start marker (4 × u64)                   ]
//!  .requests                [ base revision  magic0 | magic1 | rev     ]
//!                           [ request  id[4] | revision | response ----]---> response
//!                           [ request  id[4] | revision | response ----]---> response
//!  .requests_end_marker     [ end marker (2 × u64)                     ]
//! ```
//!
//! ## Modules
//!
//! ### Protocol ([`protocol`])
//! * **Revision Marker**: [`BaseRevision`](protocol::BaseRevision), the three-word handshake
//! * **Request Records**: [`Request<F>`](protocol::Request), typed by a sealed [`Feature`](protocol::Feature)
//! * **Responses**: `#[repr(C)]` views of the framebuffer, memory map and HHDM answers
//! * **Section Markers**: bounds of the request section
//!
//! ### Memory Layout ([`memory`])
//! * **Kernel Base**: the higher-half address the kernel is linked at
//!
//! ## ABI Compatibility
//!
//! Every record is `#[repr(C)]` and uses fixed-size integers only. Field order
//! and magic values are compatibility-critical and must match the protocol
//! bit-for-bit; the layout tests in [`protocol`] pin the sizes and offsets.
//!
//! Nothing in this crate *interprets* a response. Validation lives in the
//! `kernel-boot` crate, which is the only consumer allowed to dereference
//! a response pointer.
//!
//! [Limine boot protocol]: https://github.com/limine-bootloader/limine/blob/trunk/PROTOCOL.md

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod memory;
pub mod protocol;
