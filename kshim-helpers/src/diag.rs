//! Diagnostics: errno names, the running KUnit test, and the fatal trap

use kshim_ffi::{c_char, c_int};

use crate::host;

export! {
    /// Symbolic name of `err` (`"EINVAL"`), or null if the host has none.
    ///
    /// # Safety
    ///
    /// Always safe; the returned string is static.
    pub unsafe fn rust_helper_errname(err: c_int) -> *const c_char {
        host::errname(err)
    }

    /// Halt on an unrecoverable kernel bug. Never returns.
    ///
    /// # Safety
    ///
    /// Always safe; does not return.
    pub unsafe fn rust_helper_BUG() -> ! {
        host::BUG()
    }
}

#[cfg(CONFIG_KUNIT)]
export! {
    /// The KUnit test running on this thread, or null.
    ///
    /// # Safety
    ///
    /// Always safe.
    pub unsafe fn rust_helper_kunit_get_current_test() -> *mut kshim_ffi::kunit {
        host::kunit_get_current_test()
    }
}
