//! Revision negotiation.
//!
//! The kernel publishes the highest revision it implements in word 2 of the
//! [`BaseRevision`] marker; after the handshake the same word holds the
//! revision the bootloader agreed to speak.

use kernel_info::protocol::{BaseRevision, MAX_SUPPORTED_REVISION};
use log::{debug, error};

/// The outcome of reading the revision marker back after the handshake.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevisionOutcome {
    /// Both sides speak this revision.
    Supported(u64),
    /// The marker is clobbered or acknowledges a revision the kernel does
    /// not implement. The response layouts cannot be trusted.
    Unsupported,
}

impl RevisionOutcome {
    #[must_use]
    pub const fn revision(self) -> Option<u64> {
        match self {
            Self::Supported(revision) => Some(revision),
            Self::Unsupported => None,
        }
    }
}

/// Negotiates against [`MAX_SUPPORTED_REVISION`].
#[must_use]
pub fn negotiate(marker: &BaseRevision) -> RevisionOutcome {
    negotiate_up_to(marker, MAX_SUPPORTED_REVISION)
}

/// Negotiates against an explicit upper bound.
///
/// ```
/// use kernel_boot::{RevisionOutcome, negotiate_up_to};
/// use kernel_info::protocol::BaseRevision;
///
/// let marker = BaseRevision::new(2);
/// assert_eq!(negotiate_up_to(&marker, 3), RevisionOutcome::Supported(2));
/// assert_eq!(negotiate_up_to(&marker, 1), RevisionOutcome::Unsupported);
/// ```
#[must_use]
pub fn negotiate_up_to(marker: &BaseRevision, max: u64) -> RevisionOutcome {
    let words = marker.words();
    if !marker.has_magic() {
        error!(
            "Revision marker lost its magic ({:#018x}); the bootloader did not recognize the request section",
            words[0]
        );
        return RevisionOutcome::Unsupported;
    }

    let acknowledged = words[2];
    if acknowledged > max {
        error!("Bootloader acknowledged revision {acknowledged}, kernel implements up to {max}");
        return RevisionOutcome::Unsupported;
    }

    debug!("Negotiated boot protocol revision {acknowledged}");
    RevisionOutcome::Supported(acknowledged)
}
