use core::{
    cell::UnsafeCell,
    fmt,
    hint::spin_loop,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, Ordering},
};

/// 0 = EMPTY, 1 = FREEZING, 2 = FROZEN
const EMPTY: u8 = 0;
const FREEZING: u8 = 1;
const FROZEN: u8 = 2;

/// A cell that is written exactly once and is read-only afterwards.
///
/// This is the "freeze point" for process-wide boot state: a value is
/// produced once during early boot, moved in with [`freeze`](Self::freeze),
/// and from then on only shared references are handed out. There is no way
/// to replace or mutate a frozen value.
///
/// # Example
/// ```
/// use kernel_sync::FreezeCell;
///
/// static OFFSET: FreezeCell<u64> = FreezeCell::new();
///
/// assert!(OFFSET.get().is_none());
/// assert_eq!(OFFSET.freeze(0xffff_8000_0000_0000), Ok(&0xffff_8000_0000_0000));
/// assert_eq!(OFFSET.freeze(1), Err(1));
/// assert_eq!(OFFSET.get(), Some(&0xffff_8000_0000_0000));
/// ```
pub struct FreezeCell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Default for FreezeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FreezeCell<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Returns `Some(&T)` once the value is frozen.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        if self.is_frozen() {
            // SAFETY: FROZEN guarantees the write is done and never repeated
            Some(unsafe { (*self.value.get()).assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.state.load(Ordering::Acquire) == FROZEN
    }

    /// Store `value` and return a shared reference to it.
    ///
    /// # Errors
    /// Hands `value` back if the cell was already frozen (or is being frozen
    /// concurrently); the first value always wins.
    pub fn freeze(&self, value: T) -> Result<&T, T> {
        if self
            .state
            .compare_exchange(EMPTY, FREEZING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(value);
        }

        // SAFETY: we won the EMPTY -> FREEZING transition; nobody else writes
        unsafe {
            (*self.value.get()).write(value);
        }
        // Publish value before marking FROZEN
        self.state.store(FROZEN, Ordering::Release);
        // SAFETY: just wrote it
        Ok(unsafe { (*self.value.get()).assume_init_ref() })
    }

    /// Wait until another context finished freezing, then return the value.
    ///
    /// Returns `None` if nobody has started freezing the cell.
    #[must_use]
    pub fn wait(&self) -> Option<&T> {
        loop {
            match self.state.load(Ordering::Acquire) {
                EMPTY => return None,
                FREEZING => spin_loop(),
                // SAFETY: FROZEN
                _ => return Some(unsafe { (*self.value.get()).assume_init_ref() }),
            }
        }
    }
}

impl<T> Drop for FreezeCell<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == FROZEN {
            // SAFETY: FROZEN means the value is initialized; `&mut self` means
            // no reference handed out by `get` is alive any more.
            unsafe { self.value.get_mut().assume_init_drop() }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FreezeCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_tuple("FreezeCell").field(v).finish(),
            None => f.write_str("FreezeCell(<not frozen>)"),
        }
    }
}

// Safety: shared after FROZEN; freezing is single-writer.
unsafe impl<T: Sync + Send> Sync for FreezeCell<T> {}
unsafe impl<T: Send> Send for FreezeCell<T> {}
