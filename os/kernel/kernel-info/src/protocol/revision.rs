use core::cell::UnsafeCell;
use core::fmt;
use core::ptr;

/// The highest base revision this kernel implements.
///
/// Response layouts differ between revisions; the kernel only understands the
/// ones up to and including this value.
pub const MAX_SUPPORTED_REVISION: u64 = 3;

/// The three-word revision marker.
///
/// # ABI
/// ```text
/// word 0: protocol magic
/// word 1: forward-compatibility magic
/// word 2: requested revision; acknowledged revision after the handshake
/// ```
#[repr(C)]
pub struct BaseRevision {
    words: UnsafeCell<[u64; 3]>,
}

// SAFETY: Written by the bootloader before the kernel starts, read-only after.
unsafe impl Sync for BaseRevision {}

impl BaseRevision {
    /// Protocol magic (word 0).
    pub const MAGIC_0: u64 = 0xf956_2b2d_5c95_a6c8;

    /// Forward-compatibility magic (word 1).
    pub const MAGIC_1: u64 = 0x6a7b_3849_4453_6bdc;

    /// A marker requesting `revision`.
    #[must_use]
    pub const fn new(revision: u64) -> Self {
        Self::from_words([Self::MAGIC_0, Self::MAGIC_1, revision])
    }

    /// A marker requesting [`MAX_SUPPORTED_REVISION`].
    #[must_use]
    pub const fn latest() -> Self {
        Self::new(MAX_SUPPORTED_REVISION)
    }

    /// A marker with arbitrary contents, e.g. as left behind by a bootloader.
    #[must_use]
    pub const fn from_words(words: [u64; 3]) -> Self {
        Self {
            words: UnsafeCell::new(words),
        }
    }

    /// The marker as currently present in memory.
    #[must_use]
    pub fn words(&self) -> [u64; 3] {
        // SAFETY: the cell lives inside `self` and is always initialized.
        unsafe { ptr::read_volatile(self.words.get()) }
    }

    /// Whether word 0 still identifies the protocol.
    #[must_use]
    pub fn has_magic(&self) -> bool {
        self.words()[0] == Self::MAGIC_0
    }

    /// Word 2: the revision the bootloader acknowledged.
    #[must_use]
    pub fn acknowledged(&self) -> u64 {
        self.words()[2]
    }
}

impl Default for BaseRevision {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Debug for BaseRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [w0, w1, w2] = self.words();
        write!(f, "BaseRevision({w0:016x}, {w1:016x}, {w2})")
    }
}
