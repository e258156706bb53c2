//! # Boot Protocol Negotiation
//!
//! Turns the bootloader's answers to the kernel's requests into a
//! [`BootInfo`] snapshot.
//!
//! ## Overview
//!
//! The kernel places a [`RequestTable`] in a section the bootloader scans.
//! Before jumping to the kernel, the bootloader stores response pointers into
//! those records. At kernel entry this crate:
//!
//! 1. **negotiates** the protocol revision ([`negotiate`]);
//! 2. **validates** each response ([`validate`], [`RequestTable::validate`]),
//!    yielding views that borrow a [`ResponseWindow`];
//! 3. applies the mandatory/optional policy ([`collect`]);
//! 4. **adapts** the views into an owned [`BootInfo`] ([`adapt`]).
//!
//! ```text
//! BaseRevision ──negotiate──► RevisionOutcome
//! Request<F> ──validate──► F::Payload<'w> ──collect──► ValidatedResponses<'w>
//!                                                           │ adapt
//!                                                           ▼
//!                                                        BootInfo
//! ```
//!
//! ## Policy
//!
//! Memory map and direct map are mandatory. The framebuffer is optional by
//! default: on a headless boot [`BootInfo::framebuffer`] is
//! [`FramebufferState::Absent`] and boot continues. See [`NegotiationConfig`].
//!
//! ## Example
//!
//! ```
//! use kernel_boot::{NegotiationConfig, RequestTable, ResponseWindow, BootError, boot_info};
//! use kernel_info::protocol::{
//!     BaseRevision, DirectMapRequest, FeatureKind, FramebufferRequest, MemoryMapRequest,
//! };
//!
//! let revision = BaseRevision::latest();
//! let framebuffer = FramebufferRequest::new();
//! let memory_map = MemoryMapRequest::new();
//! let direct_map = DirectMapRequest::new();
//! let table = RequestTable::new(&revision, &framebuffer, &memory_map, &direct_map);
//!
//! // SAFETY: no response pointers are set.
//! let window = unsafe { ResponseWindow::open() };
//! let result = boot_info(&window, &table, &NegotiationConfig::DEFAULT);
//! window.close();
//!
//! assert_eq!(
//!     result.unwrap_err(),
//!     BootError::MissingMandatoryResponse(FeatureKind::MemoryMap)
//! );
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod adapt;
mod error;
mod framebuffer;
mod memory_map;
mod revision;
mod table;
mod validate;
mod window;

pub use adapt::{BootInfo, adapt};
pub use error::{BootError, Malformation, ValidationError};
pub use framebuffer::{Framebuffer, FramebufferState, FramebufferView, PixelFormat, PixelLayout};
pub use memory_map::{MAX_MEMORY_REGIONS, MemoryMap, MemoryMapView, MemoryRegion, MemoryRegionKind};
pub use revision::{RevisionOutcome, negotiate, negotiate_up_to};
pub use table::{
    Necessity, NegotiationConfig, RequestTable, ResponsePayload, ValidatedResponses, collect,
};
pub use validate::{Inspect, validate};
pub use window::ResponseWindow;

/// Negotiates, validates and adapts in one step.
///
/// The result owns all of its data; close `window` afterwards.
///
/// # Errors
/// See [`collect`].
pub fn boot_info(
    window: &ResponseWindow,
    table: &RequestTable<'_>,
    config: &NegotiationConfig,
) -> Result<BootInfo, BootError> {
    let responses = collect(window, table, config)?;
    Ok(adapt(&responses))
}
