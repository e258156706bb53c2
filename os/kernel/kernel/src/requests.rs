//! # Request section
//!
//! The records the bootloader scans for. The linker script keeps the three
//! sections in this order: start marker, requests, end marker.

use kernel_boot::RequestTable;
use kernel_info::protocol::{
    BaseRevision, DirectMapRequest, FramebufferRequest, MemoryMapRequest, RequestsEndMarker,
    RequestsStartMarker,
};

#[used]
#[unsafe(link_section = ".requests_start_marker")]
static START_MARKER: RequestsStartMarker = RequestsStartMarker::new();

/// Asks for the highest revision the kernel implements.
#[used]
#[unsafe(link_section = ".requests")]
static BASE_REVISION: BaseRevision = BaseRevision::latest();

#[used]
#[unsafe(link_section = ".requests")]
static FRAMEBUFFER_REQUEST: FramebufferRequest = FramebufferRequest::new();

#[used]
#[unsafe(link_section = ".requests")]
static MEMORY_MAP_REQUEST: MemoryMapRequest = MemoryMapRequest::new();

#[used]
#[unsafe(link_section = ".requests")]
static DIRECT_MAP_REQUEST: DirectMapRequest = DirectMapRequest::new();

#[used]
#[unsafe(link_section = ".requests_end_marker")]
static END_MARKER: RequestsEndMarker = RequestsEndMarker::new();

/// The request section as seen by the negotiation layer.
#[must_use]
pub fn table() -> RequestTable<'static> {
    RequestTable::new(
        &BASE_REVISION,
        &FRAMEBUFFER_REQUEST,
        &MEMORY_MAP_REQUEST,
        &DIRECT_MAP_REQUEST,
    )
}
