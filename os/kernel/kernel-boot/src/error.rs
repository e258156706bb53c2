use kernel_info::protocol::FeatureKind;

/// Why a single response could not be trusted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The bootloader did not answer the request (null response pointer),
    /// or answered it with nothing to offer.
    #[error("no response")]
    Missing,
    #[error("malformed response: {0}")]
    Malformed(#[from] Malformation),
}

/// The structural check a response failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Malformation {
    #[error("request identifier no longer carries the feature tag")]
    TagMismatch,

    #[error("framebuffer array entry is null")]
    NullFramebuffer,
    #[error("framebuffer address is null")]
    NullFramebufferAddress,
    #[error("framebuffer has zero width or height")]
    EmptyFramebufferGeometry,
    #[error("unsupported bits per pixel: {0}")]
    BitsPerPixel(u16),
    #[error("pitch of {pitch} bytes is shorter than a row of {row} bytes")]
    PitchTooSmall { pitch: u64, row: u64 },
    #[error("framebuffer dimensions overflow the address space")]
    PitchOverflow,
    #[error("unsupported memory model {0}")]
    UnsupportedMemoryModel(u8),
    #[error("a color channel does not fit into {bpp} bits per pixel")]
    ChannelOutOfRange { bpp: u16 },
    #[error("framebuffer at {0:#x} lies outside the direct map")]
    FramebufferOutsideDirectMap(u64),

    #[error("memory map has no entries")]
    EmptyMemoryMap,
    #[error("memory map entry array is null")]
    NullEntryArray,
    #[error("memory map has {0} entries, more than the kernel can hold")]
    TooManyRegions(u64),
    #[error("memory map entry {index} is null")]
    NullEntry { index: usize },
    #[error("memory map entry {index} wraps around the address space")]
    RegionOverflow { index: usize },
    #[error("memory map entry {index} is not sorted by base address")]
    UnsortedRegions { index: usize },
    #[error("memory map entry {index} overlaps its predecessor")]
    OverlappingRegions { index: usize },

    #[error("direct map offset {0:#x} is not in the higher half")]
    DirectMapNotHigherHalf(u64),
    #[error("direct map offset {0:#x} is not page aligned")]
    DirectMapUnaligned(u64),
}

/// A failure the kernel cannot boot past.
///
/// Failures of optional capabilities are recovered during collection and
/// never surface as a `BootError`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    #[error("bootloader does not speak a supported protocol revision")]
    UnsupportedRevision,
    #[error("mandatory {0} response is missing")]
    MissingMandatoryResponse(FeatureKind),
    #[error("mandatory {feature} response is malformed: {reason}")]
    MalformedResponse {
        feature: FeatureKind,
        reason: Malformation,
    },
}

impl BootError {
    /// Lifts a validation failure of a mandatory `feature`.
    #[must_use]
    pub const fn mandatory(feature: FeatureKind, error: ValidationError) -> Self {
        match error {
            ValidationError::Missing => Self::MissingMandatoryResponse(feature),
            ValidationError::Malformed(reason) => Self::MalformedResponse { feature, reason },
        }
    }

    /// Whether response layouts may still be read after this failure.
    ///
    /// Only a negotiated revision fixes the layouts; after
    /// [`Self::UnsupportedRevision`] no response may be dereferenced.
    #[must_use]
    pub const fn responses_readable(&self) -> bool {
        !matches!(self, Self::UnsupportedRevision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_failures_keep_the_feature() {
        assert_eq!(
            BootError::mandatory(FeatureKind::DirectMap, ValidationError::Missing),
            BootError::MissingMandatoryResponse(FeatureKind::DirectMap)
        );
        assert_eq!(
            BootError::mandatory(
                FeatureKind::MemoryMap,
                Malformation::OverlappingRegions { index: 1 }.into()
            ),
            BootError::MalformedResponse {
                feature: FeatureKind::MemoryMap,
                reason: Malformation::OverlappingRegions { index: 1 },
            }
        );
    }

    #[test]
    fn responses_stay_unreadable_without_a_revision() {
        assert!(!BootError::UnsupportedRevision.responses_readable());
        assert!(BootError::MissingMandatoryResponse(FeatureKind::DirectMap).responses_readable());
        assert!(
            BootError::mandatory(FeatureKind::MemoryMap, Malformation::EmptyMemoryMap.into())
                .responses_readable()
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = BootError::MalformedResponse {
            feature: FeatureKind::Framebuffer,
            reason: Malformation::PitchTooSmall { pitch: 10, row: 40 },
        };
        assert_eq!(
            err.to_string(),
            "mandatory framebuffer response is malformed: \
             pitch of 10 bytes is shorter than a row of 40 bytes"
        );
    }
}
