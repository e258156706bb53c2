use super::{COMMON_MAGIC_0, COMMON_MAGIC_1, Feature};
use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::ptr;

/// 256-bit request identifier: two common magic words followed by the
/// feature's 128-bit tag.
#[repr(C)]
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RequestId([u64; 4]);

impl RequestId {
    #[must_use]
    pub const fn new(tag: [u64; 2]) -> Self {
        Self([COMMON_MAGIC_0, COMMON_MAGIC_1, tag[0], tag[1]])
    }

    #[must_use]
    pub const fn from_words(words: [u64; 4]) -> Self {
        Self(words)
    }

    #[must_use]
    pub const fn words(&self) -> [u64; 4] {
        self.0
    }

    /// The feature-specific half of the identifier.
    #[must_use]
    pub const fn tag(&self) -> [u64; 2] {
        [self.0[2], self.0[3]]
    }

    #[must_use]
    pub const fn has_common_magic(&self) -> bool {
        self.0[0] == COMMON_MAGIC_0 && self.0[1] == COMMON_MAGIC_1
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RequestId({:016x}:{:016x}:{:016x}:{:016x})",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// A request record for feature `F`.
///
/// # ABI
/// ```text
/// offset  0: id        [u64; 4]
/// offset 32: revision  u64
/// offset 40: response  *const F::Response (null until answered)
/// ```
///
/// The response pointer is written by the bootloader before the kernel runs,
/// so every read goes through a volatile load.
#[repr(C)]
pub struct Request<F: Feature> {
    id: UnsafeCell<RequestId>,
    revision: u64,
    response: UnsafeCell<*const F::Response>,
    _feature: PhantomData<F>,
}

// SAFETY: The bootloader writes the record before the kernel starts; the
// kernel only ever reads it, on a single CPU.
unsafe impl<F: Feature> Sync for Request<F> {}

impl<F: Feature> Request<F> {
    /// A fresh, unanswered request.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_response(ptr::null())
    }

    /// A request that already carries `response`, as the bootloader would
    /// leave it.
    #[must_use]
    pub const fn with_response(response: *const F::Response) -> Self {
        Self {
            id: UnsafeCell::new(RequestId::new(F::TAG)),
            revision: F::REVISION,
            response: UnsafeCell::new(response),
            _feature: PhantomData,
        }
    }

    /// Replaces the identifier, e.g. to model a record the bootloader
    /// scribbled over.
    #[must_use]
    pub const fn with_id(mut self, id: RequestId) -> Self {
        self.id = UnsafeCell::new(id);
        self
    }

    /// The identifier as currently present in memory.
    #[must_use]
    pub fn id(&self) -> RequestId {
        // SAFETY: the cell lives inside `self` and is always initialized.
        unsafe { ptr::read_volatile(self.id.get()) }
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The raw response pointer; null if the bootloader did not answer.
    #[must_use]
    pub fn response_ptr(&self) -> *const F::Response {
        // SAFETY: the cell lives inside `self` and is always initialized.
        unsafe { ptr::read_volatile(self.response.get()) }
    }
}

impl<F: Feature> Default for Request<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Feature> fmt::Debug for Request<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("feature", &F::KIND)
            .field("id", &self.id())
            .field("revision", &self.revision)
            .field("response", &self.response_ptr())
            .finish()
    }
}
