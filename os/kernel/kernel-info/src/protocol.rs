//! # Boot Protocol ABI
//!
//! `#[repr(C)]` definitions of the request section and the responses the
//! bootloader writes. Field names follow the protocol document.

mod feature;
mod framebuffer;
mod hhdm;
mod markers;
mod memory_map;
mod request;
mod revision;

pub use feature::{DirectMapFeature, Feature, FeatureKind, FramebufferFeature, MemoryMapFeature};
pub use framebuffer::{FramebufferResponse, MEMORY_MODEL_RGB, RawFramebuffer};
pub use hhdm::HhdmResponse;
pub use markers::{RequestsEndMarker, RequestsStartMarker};
pub use memory_map::{MemoryMapEntry, MemoryMapEntryType, MemoryMapResponse};
pub use request::{Request, RequestId};
pub use revision::{BaseRevision, MAX_SUPPORTED_REVISION};

/// First of the two magic words shared by every request identifier.
pub const COMMON_MAGIC_0: u64 = 0xc7b1_dd30_df4c_8b88;

/// Second of the two magic words shared by every request identifier.
pub const COMMON_MAGIC_1: u64 = 0x0a82_e883_a194_f07b;

/// Request for the framebuffer.
pub type FramebufferRequest = Request<FramebufferFeature>;

/// Request for the physical memory map.
pub type MemoryMapRequest = Request<MemoryMapFeature>;

/// Request for the Higher Half Direct Map offset.
pub type DirectMapRequest = Request<DirectMapFeature>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn request_layout_matches_protocol() {
        assert_eq!(size_of::<FramebufferRequest>(), 48);
        assert_eq!(size_of::<MemoryMapRequest>(), 48);
        assert_eq!(size_of::<DirectMapRequest>(), 48);
        assert_eq!(size_of::<BaseRevision>(), 24);
    }

    #[test]
    fn response_layouts_match_protocol() {
        assert_eq!(size_of::<HhdmResponse>(), 16);
        assert_eq!(size_of::<MemoryMapResponse>(), 24);
        assert_eq!(size_of::<MemoryMapEntry>(), 24);
        assert_eq!(size_of::<FramebufferResponse>(), 24);

        assert_eq!(offset_of!(RawFramebuffer, pitch), 24);
        assert_eq!(offset_of!(RawFramebuffer, bpp), 32);
        assert_eq!(offset_of!(RawFramebuffer, memory_model), 34);
        assert_eq!(offset_of!(RawFramebuffer, blue_mask_shift), 40);
        assert_eq!(offset_of!(RawFramebuffer, edid_size), 48);
        assert_eq!(offset_of!(RawFramebuffer, edid), 56);
        assert_eq!(size_of::<RawFramebuffer>(), 64);
    }

    #[test]
    fn markers_have_protocol_sizes() {
        assert_eq!(size_of::<RequestsStartMarker>(), 32);
        assert_eq!(size_of::<RequestsEndMarker>(), 16);
    }
}
