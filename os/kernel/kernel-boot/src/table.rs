//! # Request table and collection policy
//!
//! [`RequestTable`] gathers the four records the kernel places in the request
//! section. [`collect`] negotiates the revision and validates every feature,
//! applying the mandatory/optional policy of [`NegotiationConfig`].

use crate::error::{BootError, ValidationError};
use crate::framebuffer::{Framebuffer, FramebufferView};
use crate::memory_map::MemoryMapView;
use crate::revision::{RevisionOutcome, negotiate_up_to};
use crate::validate::validate;
use crate::window::ResponseWindow;
use kernel_info::protocol::{
    BaseRevision, DirectMapRequest, FeatureKind, FramebufferRequest, MAX_SUPPORTED_REVISION,
    MemoryMapRequest,
};
use kernel_memory_addresses::DirectMapOffset;
use log::{info, warn};

/// A borrowed view of the request section.
#[derive(Debug, Copy, Clone)]
pub struct RequestTable<'a> {
    pub revision: &'a BaseRevision,
    pub framebuffer: &'a FramebufferRequest,
    pub memory_map: &'a MemoryMapRequest,
    pub direct_map: &'a DirectMapRequest,
}

/// A validated payload of any known feature.
#[derive(Debug, Copy, Clone)]
pub enum ResponsePayload<'w> {
    Framebuffer(FramebufferView<'w>),
    MemoryMap(MemoryMapView<'w>),
    DirectMap(DirectMapOffset),
}

impl ResponsePayload<'_> {
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Framebuffer(_) => FeatureKind::Framebuffer,
            Self::MemoryMap(_) => FeatureKind::MemoryMap,
            Self::DirectMap(_) => FeatureKind::DirectMap,
        }
    }
}

impl<'a> RequestTable<'a> {
    #[must_use]
    pub const fn new(
        revision: &'a BaseRevision,
        framebuffer: &'a FramebufferRequest,
        memory_map: &'a MemoryMapRequest,
        direct_map: &'a DirectMapRequest,
    ) -> Self {
        Self {
            revision,
            framebuffer,
            memory_map,
            direct_map,
        }
    }

    /// Validates the response of the request for `kind`.
    ///
    /// # Errors
    /// See [`validate`].
    pub fn validate<'w>(
        &self,
        window: &'w ResponseWindow,
        kind: FeatureKind,
    ) -> Result<ResponsePayload<'w>, ValidationError> {
        match kind {
            FeatureKind::Framebuffer => {
                validate(window, self.framebuffer).map(ResponsePayload::Framebuffer)
            }
            FeatureKind::MemoryMap => {
                validate(window, self.memory_map).map(ResponsePayload::MemoryMap)
            }
            FeatureKind::DirectMap => {
                validate(window, self.direct_map).map(ResponsePayload::DirectMap)
            }
        }
    }
}

/// Whether boot can continue without a feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Necessity {
    Mandatory,
    Optional,
}

/// Negotiation policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NegotiationConfig {
    /// Highest protocol revision the kernel accepts.
    pub max_revision: u64,
    /// Whether a framebuffer is required; headless machines have none.
    pub framebuffer: Necessity,
}

impl NegotiationConfig {
    pub const DEFAULT: Self = Self {
        max_revision: MAX_SUPPORTED_REVISION,
        framebuffer: Necessity::Optional,
    };

    /// Memory map and direct map are always mandatory: without them no
    /// allocator or address translation can work.
    #[must_use]
    pub const fn necessity(&self, kind: FeatureKind) -> Necessity {
        match kind {
            FeatureKind::Framebuffer => self.framebuffer,
            FeatureKind::MemoryMap | FeatureKind::DirectMap => Necessity::Mandatory,
        }
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything that validated. The memory map still borrows bootloader
/// memory; the framebuffer has already been placed in the direct map.
#[derive(Debug, Copy, Clone)]
pub struct ValidatedResponses<'w> {
    pub(crate) revision: u64,
    pub(crate) memory_map: MemoryMapView<'w>,
    pub(crate) direct_map: DirectMapOffset,
    pub(crate) framebuffer: Option<Framebuffer>,
}

impl<'w> ValidatedResponses<'w> {
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn memory_map(&self) -> MemoryMapView<'w> {
        self.memory_map
    }

    #[must_use]
    pub const fn direct_map(&self) -> DirectMapOffset {
        self.direct_map
    }

    #[must_use]
    pub const fn framebuffer(&self) -> Option<Framebuffer> {
        self.framebuffer
    }
}

/// Negotiates the revision and validates every feature.
///
/// Features are validated in [`FeatureKind::ALL`] order. Failures of
/// optional features are logged and leave the feature absent. A framebuffer
/// outside the direct map counts as malformed.
///
/// # Errors
/// [`BootError::UnsupportedRevision`] if negotiation fails, otherwise the
/// first failure of a mandatory feature.
pub fn collect<'w>(
    window: &'w ResponseWindow,
    table: &RequestTable<'_>,
    config: &NegotiationConfig,
) -> Result<ValidatedResponses<'w>, BootError> {
    let RevisionOutcome::Supported(revision) = negotiate_up_to(table.revision, config.max_revision)
    else {
        return Err(BootError::UnsupportedRevision);
    };

    let mut memory_map = None;
    let mut direct_map = None;
    let mut framebuffer = None;

    for kind in FeatureKind::ALL {
        let payload = match table.validate(window, kind) {
            Ok(payload) => payload,
            Err(error) => {
                tolerate(kind, error, config)?;
                continue;
            }
        };

        match payload {
            ResponsePayload::MemoryMap(view) => memory_map = Some(view),
            ResponsePayload::DirectMap(offset) => direct_map = Some(offset),
            ResponsePayload::Framebuffer(view) => framebuffer = Some(view),
        }
    }

    // Both are mandatory; a failure above has already returned.
    let memory_map =
        memory_map.ok_or(BootError::MissingMandatoryResponse(FeatureKind::MemoryMap))?;
    let direct_map =
        direct_map.ok_or(BootError::MissingMandatoryResponse(FeatureKind::DirectMap))?;

    // The framebuffer must be reachable through the direct map.
    let framebuffer = match framebuffer.map(|view| view.place(direct_map)).transpose() {
        Ok(framebuffer) => framebuffer,
        Err(reason) => {
            tolerate(FeatureKind::Framebuffer, reason.into(), config)?;
            None
        }
    };

    info!(
        "Boot protocol revision {revision}: {} memory regions, direct map at {direct_map}, framebuffer {}",
        memory_map.len(),
        if framebuffer.is_some() { "present" } else { "absent" }
    );

    Ok(ValidatedResponses {
        revision,
        memory_map,
        direct_map,
        framebuffer,
    })
}

/// Applies the policy to a failed feature: mandatory failures abort boot,
/// optional ones are logged and leave the feature absent.
fn tolerate(
    kind: FeatureKind,
    error: ValidationError,
    config: &NegotiationConfig,
) -> Result<(), BootError> {
    match (error, config.necessity(kind)) {
        (error, Necessity::Mandatory) => Err(BootError::mandatory(kind, error)),
        (ValidationError::Missing, Necessity::Optional) => {
            warn!("No {kind} available; continuing without it");
            Ok(())
        }
        (ValidationError::Malformed(reason), Necessity::Optional) => {
            warn!("Ignoring malformed {kind} response: {reason}");
            Ok(())
        }
    }
}
