use super::{FramebufferResponse, HhdmResponse, MemoryMapResponse};
use core::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A capability the kernel can request from the bootloader.
///
/// Implemented only by the marker types of this module; each one binds the
/// protocol tag to the layout of the response the bootloader answers with.
pub trait Feature: sealed::Sealed + 'static {
    /// The closed enumeration entry this feature corresponds to.
    const KIND: FeatureKind;

    /// The feature-specific half of the request identifier.
    const TAG: [u64; 2];

    /// Request revision the kernel publishes.
    const REVISION: u64 = 0;

    /// Layout of the response record.
    type Response;
}

/// Marker for the framebuffer feature.
#[derive(Debug, Copy, Clone)]
pub struct FramebufferFeature;

/// Marker for the memory map feature.
#[derive(Debug, Copy, Clone)]
pub struct MemoryMapFeature;

/// Marker for the Higher Half Direct Map feature.
#[derive(Debug, Copy, Clone)]
pub struct DirectMapFeature;

impl sealed::Sealed for FramebufferFeature {}
impl Feature for FramebufferFeature {
    const KIND: FeatureKind = FeatureKind::Framebuffer;
    const TAG: [u64; 2] = [0x9d58_27dc_d881_dd75, 0xa314_8604_f6fa_b11b];
    type Response = FramebufferResponse;
}

impl sealed::Sealed for MemoryMapFeature {}
impl Feature for MemoryMapFeature {
    const KIND: FeatureKind = FeatureKind::MemoryMap;
    const TAG: [u64; 2] = [0x67cf_3d9d_378a_806f, 0xe304_acdf_c50c_3c62];
    type Response = MemoryMapResponse;
}

impl sealed::Sealed for DirectMapFeature {}
impl Feature for DirectMapFeature {
    const KIND: FeatureKind = FeatureKind::DirectMap;
    const TAG: [u64; 2] = [0x48dc_f1cb_8ad2_b852, 0x6398_4e95_9a98_244b];
    type Response = HhdmResponse;
}

/// The capabilities this kernel knows how to request.
///
/// Requests are matched by magic values on the wire; inside the kernel they
/// are discriminated by this enumeration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FeatureKind {
    Framebuffer,
    MemoryMap,
    DirectMap,
}

impl FeatureKind {
    /// Every known feature, in the order the kernel validates them.
    ///
    /// The direct map comes before the framebuffer because the framebuffer's
    /// physical address is derived from it.
    pub const ALL: [Self; 3] = [Self::MemoryMap, Self::DirectMap, Self::Framebuffer];

    #[must_use]
    pub const fn tag(self) -> [u64; 2] {
        match self {
            Self::Framebuffer => FramebufferFeature::TAG,
            Self::MemoryMap => MemoryMapFeature::TAG,
            Self::DirectMap => DirectMapFeature::TAG,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Framebuffer => "framebuffer",
            Self::MemoryMap => "memory map",
            Self::DirectMap => "direct map",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct() {
        let [a, b, c] = FeatureKind::ALL.map(FeatureKind::tag);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn kinds_point_back_to_their_feature() {
        assert_eq!(FramebufferFeature::KIND.tag(), FramebufferFeature::TAG);
        assert_eq!(MemoryMapFeature::KIND.tag(), MemoryMapFeature::TAG);
        assert_eq!(DirectMapFeature::KIND.tag(), DirectMapFeature::TAG);
    }
}
