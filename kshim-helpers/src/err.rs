//! Error pointers
//!
//! The host encodes `-errno` in the top `MAX_ERRNO` bytes of the address
//! space. All three helpers are inlines in `<linux/err.h>` with no symbol to
//! forward to, so the encoding is done here, bit for bit as the header does.

use kshim_ffi::{c_long, c_void, MAX_ERRNO};

export! {
    /// Linux equivalent: `ERR_PTR(error)`
    ///
    /// # Safety
    ///
    /// Always safe; the result must not be dereferenced.
    pub unsafe fn rust_helper_ERR_PTR(error: c_long) -> *mut c_void {
        error as isize as *mut c_void
    }

    /// Linux equivalent: `IS_ERR(ptr)`
    ///
    /// # Safety
    ///
    /// Always safe; `ptr` is only compared.
    pub unsafe fn rust_helper_IS_ERR(ptr: *const c_void) -> bool {
        ptr as usize >= -(MAX_ERRNO as isize) as usize
    }

    /// Linux equivalent: `PTR_ERR(ptr)`
    ///
    /// # Safety
    ///
    /// Meaningful only when `IS_ERR(ptr)` holds.
    pub unsafe fn rust_helper_PTR_ERR(ptr: *const c_void) -> c_long {
        ptr as isize as c_long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::stub::take_calls;
    use kshim_ffi::KernelError;
    use proptest::prelude::*;

    #[test]
    fn test_encoding_makes_no_host_call() {
        take_calls();
        unsafe {
            let ptr = rust_helper_ERR_PTR(-5);
            let _ = rust_helper_IS_ERR(ptr);
            let _ = rust_helper_PTR_ERR(ptr);
        }
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_errno_boundary() {
        let lowest = -(MAX_ERRNO as c_long);
        unsafe {
            assert!(rust_helper_IS_ERR(rust_helper_ERR_PTR(lowest)));
            assert!(!rust_helper_IS_ERR(rust_helper_ERR_PTR(lowest - 1)));
            assert_eq!(rust_helper_ERR_PTR(-1) as usize, usize::MAX);
        }
    }

    #[test]
    fn test_enomem_round_trip() {
        let errno = KernelError::ENOMEM.to_errno() as c_long;
        unsafe {
            let ptr = rust_helper_ERR_PTR(errno);
            assert!(rust_helper_IS_ERR(ptr));
            assert_eq!(rust_helper_PTR_ERR(ptr), errno);
        }
    }

    #[test]
    fn test_valid_pointers_are_not_errors() {
        let value = 0u64;
        unsafe {
            assert!(!rust_helper_IS_ERR(std::ptr::null()));
            assert!(!rust_helper_IS_ERR(&value as *const u64 as *const c_void));
            let below = (MAX_ERRNO as usize + 1).wrapping_neg() as *const c_void;
            assert!(!rust_helper_IS_ERR(below));
        }
    }

    proptest! {
        #[test]
        fn prop_err_ptr_round_trips(err in -(MAX_ERRNO as c_long)..=-1) {
            let ptr = unsafe { rust_helper_ERR_PTR(err) };
            let is_err = unsafe { rust_helper_IS_ERR(ptr) };
            let back = unsafe { rust_helper_PTR_ERR(ptr) };
            prop_assert!(is_err);
            prop_assert_eq!(back, err);
        }
    }
}
