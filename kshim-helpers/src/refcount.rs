//! Reference counting
//!
//! Request references and plain `refcount_t` counters. The request helpers
//! are the only way a driver can take or drop a reference on a request it
//! found through a tag lookup.

use kshim_ffi::{c_int, refcount_t, request};

use crate::host;

export! {
    /// Take a reference on `req` unless it already dropped to zero.
    ///
    /// Returns `false` without touching the count when it is zero.
    ///
    /// # Safety
    ///
    /// `req` must point at request memory that stays allocated for the call.
    pub unsafe fn rust_helper_req_ref_inc_not_zero(req: *mut request) -> bool {
        host::req_ref_inc_not_zero(req)
    }

    /// Drop a reference on `req`; `true` when it was the last one.
    ///
    /// # Safety
    ///
    /// The caller must own a reference on `req`.
    pub unsafe fn rust_helper_req_ref_put_and_test(req: *mut request) -> bool {
        host::req_ref_put_and_test(req)
    }

    /// Linux equivalent: `REFCOUNT_INIT(n)`
    ///
    /// The host only has this as an initializer macro, so the value is
    /// built here.
    ///
    /// # Safety
    ///
    /// Always safe to call; `unsafe` only for the uniform export signature.
    pub unsafe fn rust_helper_REFCOUNT_INIT(n: c_int) -> refcount_t {
        refcount_t::new(n)
    }

    /// # Safety
    ///
    /// `r` must point at a live `refcount_t`.
    pub unsafe fn rust_helper_refcount_inc(r: *mut refcount_t) {
        host::refcount_inc(r)
    }

    /// # Safety
    ///
    /// `r` must point at a live `refcount_t` the caller holds a count on.
    pub unsafe fn rust_helper_refcount_dec_and_test(r: *mut refcount_t) -> bool {
        host::refcount_dec_and_test(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::stub::{take_calls, StubRequest, REFCOUNT_SATURATED};

    #[test]
    fn test_inc_not_zero_on_zero_is_refused() {
        let rq = StubRequest::new(0);

        assert!(!unsafe { rust_helper_req_ref_inc_not_zero(rq.as_ptr()) });
        assert_eq!(rq.refs(), 0);
    }

    #[test]
    fn test_inc_not_zero_on_live_request() {
        let rq = StubRequest::new(1);

        assert!(unsafe { rust_helper_req_ref_inc_not_zero(rq.as_ptr()) });
        assert_eq!(rq.refs(), 2);
    }

    #[test]
    fn test_put_and_test_true_only_on_last_put() {
        let rq = StubRequest::new(2);
        unsafe {
            assert!(!rust_helper_req_ref_put_and_test(rq.as_ptr()));
            assert!(rust_helper_req_ref_put_and_test(rq.as_ptr()));
        }
        assert_eq!(rq.refs(), 0);
    }

    #[test]
    fn test_refcount_init_makes_no_host_call() {
        take_calls();
        let r = unsafe { rust_helper_REFCOUNT_INIT(3) };
        assert_eq!(r.read(), 3);
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_refcount_lifecycle() {
        let mut r = unsafe { rust_helper_REFCOUNT_INIT(1) };
        unsafe {
            rust_helper_refcount_inc(&mut r);
            assert!(!rust_helper_refcount_dec_and_test(&mut r));
            assert!(rust_helper_refcount_dec_and_test(&mut r));
        }
        assert_eq!(r.read(), 0);
    }

    #[test]
    fn test_refcount_inc_from_zero_saturates() {
        let mut r = unsafe { rust_helper_REFCOUNT_INIT(0) };
        unsafe { rust_helper_refcount_inc(&mut r) };
        assert_eq!(r.read(), REFCOUNT_SATURATED);
    }
}
