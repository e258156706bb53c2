//! # Response validation
//!
//! A response is trusted only after three checks, in this order:
//!
//! 1. the response pointer is non-null (otherwise [`ValidationError::Missing`],
//!    and the pointer is never dereferenced);
//! 2. the request still carries the feature's identifier;
//! 3. the payload passes the feature's structural checks.

use crate::error::{Malformation, ValidationError};
use crate::framebuffer::FramebufferView;
use crate::memory_map::MemoryMapView;
use crate::window::ResponseWindow;
use kernel_info::protocol::{
    DirectMapFeature, Feature, FramebufferFeature, HhdmResponse, MemoryMapFeature, Request,
    RequestId,
};
use kernel_memory_addresses::DirectMapOffset;
use log::debug;

/// Structural checks of one feature's response.
pub trait Inspect: Feature {
    /// What a valid response is turned into.
    type Payload<'w>;

    /// The revision the bootloader stamped on its response.
    fn response_revision(response: &Self::Response) -> u64;

    /// Validates a response that is known to be present.
    ///
    /// # Errors
    /// Returns [`ValidationError::Missing`] if the bootloader answered with
    /// nothing to offer, and [`ValidationError::Malformed`] if a structural
    /// check fails.
    fn inspect<'w>(
        window: &'w ResponseWindow,
        response: &'w Self::Response,
    ) -> Result<Self::Payload<'w>, ValidationError>;
}

impl Inspect for FramebufferFeature {
    type Payload<'w> = FramebufferView<'w>;

    fn response_revision(response: &Self::Response) -> u64 {
        response.revision
    }

    fn inspect<'w>(
        window: &'w ResponseWindow,
        response: &'w Self::Response,
    ) -> Result<Self::Payload<'w>, ValidationError> {
        FramebufferView::inspect(window, response)
    }
}

impl Inspect for MemoryMapFeature {
    type Payload<'w> = MemoryMapView<'w>;

    fn response_revision(response: &Self::Response) -> u64 {
        response.revision
    }

    fn inspect<'w>(
        window: &'w ResponseWindow,
        response: &'w Self::Response,
    ) -> Result<Self::Payload<'w>, ValidationError> {
        MemoryMapView::inspect(window, response)
    }
}

impl Inspect for DirectMapFeature {
    type Payload<'w> = DirectMapOffset;

    fn response_revision(response: &Self::Response) -> u64 {
        response.revision
    }

    fn inspect<'w>(
        _window: &'w ResponseWindow,
        response: &'w HhdmResponse,
    ) -> Result<Self::Payload<'w>, ValidationError> {
        Ok(check_direct_map(response.offset)?)
    }
}

/// The direct map must live in the higher half and start on a page boundary.
fn check_direct_map(offset: u64) -> Result<DirectMapOffset, Malformation> {
    let offset = DirectMapOffset::new(offset);
    if !offset.is_higher_half() {
        return Err(Malformation::DirectMapNotHigherHalf(offset.as_u64()));
    }
    if !offset.is_page_aligned() {
        return Err(Malformation::DirectMapUnaligned(offset.as_u64()));
    }
    Ok(offset)
}

/// Validates the response to `request`.
///
/// The returned payload borrows `window`.
///
/// # Errors
/// See [`Inspect::inspect`]; additionally [`Malformation::TagMismatch`] if
/// the request identifier was overwritten.
pub fn validate<'w, F: Inspect>(
    window: &'w ResponseWindow,
    request: &Request<F>,
) -> Result<F::Payload<'w>, ValidationError> {
    // SAFETY: `request` is part of the request section, whose response
    // pointers are covered by the window.
    let Some(response) = (unsafe { window.borrow(request.response_ptr()) }) else {
        debug!("No {} response", F::KIND);
        return Err(ValidationError::Missing);
    };

    if request.id() != RequestId::new(F::TAG) {
        return Err(Malformation::TagMismatch.into());
    }

    // Later revisions only append fields, so the prefix read here stays valid.
    let revision = F::response_revision(response);
    if revision > F::REVISION {
        debug!(
            "{} response has revision {revision}; reading the revision {} layout",
            F::KIND,
            F::REVISION
        );
    }

    F::inspect(window, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_info::protocol::{DirectMapRequest, FramebufferRequest};

    #[test]
    fn null_response_is_missing() {
        let window = unsafe { ResponseWindow::open() };
        let request = FramebufferRequest::new();
        assert_eq!(
            validate(&window, &request).map(|view| view.width()),
            Err(ValidationError::Missing)
        );
    }

    #[test]
    fn direct_map_must_be_in_the_higher_half() {
        assert_eq!(
            check_direct_map(0x0000_8000_0000_0000),
            Err(Malformation::DirectMapNotHigherHalf(0x0000_8000_0000_0000))
        );
        assert_eq!(
            check_direct_map(0xffff_8000_0000_0010),
            Err(Malformation::DirectMapUnaligned(0xffff_8000_0000_0010))
        );
        assert_eq!(
            check_direct_map(0xffff_8000_0000_0000).map(DirectMapOffset::as_u64),
            Ok(0xffff_8000_0000_0000)
        );
    }

    #[test]
    fn overwritten_identifier_is_rejected() {
        static HHDM: HhdmResponse = HhdmResponse {
            revision: 0,
            offset: 0xffff_8000_0000_0000,
        };
        let request = DirectMapRequest::with_response(&raw const HHDM)
            .with_id(RequestId::from_words([0; 4]));
        let window = unsafe { ResponseWindow::open() };
        assert_eq!(
            validate(&window, &request),
            Err(ValidationError::Malformed(Malformation::TagMismatch))
        );
    }

    #[test]
    fn newer_response_revisions_are_accepted() {
        static HHDM: HhdmResponse = HhdmResponse {
            revision: 7,
            offset: 0xffff_8000_0000_0000,
        };
        let request = DirectMapRequest::with_response(&raw const HHDM);
        let window = unsafe { ResponseWindow::open() };
        assert_eq!(
            validate(&window, &request),
            Ok(DirectMapOffset::new(0xffff_8000_0000_0000))
        );
    }
}
