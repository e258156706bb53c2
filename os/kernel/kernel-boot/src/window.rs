use log::debug;

/// Proof that bootloader-owned response memory is still intact.
///
/// Every validated view borrows the window, so the window cannot be
/// [closed](Self::close) while a view is alive. Code that later reclaims
/// bootloader-reclaimable memory takes the window by value first, which
/// turns "use after reclaim" into a borrow error.
///
/// ```compile_fail
/// use kernel_boot::{ResponseWindow, validate};
/// use kernel_info::protocol::DirectMapRequest;
///
/// let request = DirectMapRequest::new();
/// let window = unsafe { ResponseWindow::open() };
/// let view = validate(&window, &request);
/// window.close();
/// drop(view);
/// ```
#[derive(Debug)]
pub struct ResponseWindow {
    _private: (),
}

impl ResponseWindow {
    /// Opens the window at kernel entry.
    ///
    /// # Safety
    /// Every non-null response pointer in the request section, and every
    /// pointer reachable from a response, must point to memory written by
    /// the bootloader that stays mapped and unmodified until the returned
    /// window is closed. Only one window may be open at a time.
    #[must_use]
    pub const unsafe fn open() -> Self {
        Self { _private: () }
    }

    /// Closes the window; no view into bootloader memory outlives this call.
    pub fn close(self) {
        debug!("Closing the response window");
    }

    /// Borrows bootloader memory for the lifetime of the window.
    ///
    /// # Safety
    /// `ptr` must be null or covered by the guarantee given to [`open`](Self::open).
    #[allow(clippy::unused_self)]
    pub(crate) unsafe fn borrow<T>(&self, ptr: *const T) -> Option<&T> {
        // SAFETY: non-null pointers are valid while the window is open.
        unsafe { ptr.as_ref() }
    }

    /// Borrows a bootloader-owned array of `len` elements.
    ///
    /// # Safety
    /// `ptr` must be non-null, aligned and point to `len` initialized
    /// elements covered by the guarantee given to [`open`](Self::open).
    #[allow(clippy::unused_self)]
    pub(crate) unsafe fn borrow_slice<T>(&self, ptr: *const T, len: usize) -> &[T] {
        // SAFETY: forwarded to the caller.
        unsafe { core::slice::from_raw_parts(ptr, len) }
    }
}
