//! Block layer request accessors
//!
//! `blk-mq` keeps these as `static inline` helpers in `<linux/blk-mq.h>` and
//! `<linux/bvec.h>`, so a consumer has no symbol to bind without them.

use kshim_ffi::{bio, bio_vec, blk_mq_tags, bvec_iter, c_uint, c_ushort, c_void, request};

use crate::host;

export! {
    /// Current segment of `rq`, by value.
    ///
    /// Linux equivalent: `req_bvec(rq)`
    ///
    /// # Safety
    ///
    /// `rq` must be a live request with at least one bio attached.
    pub unsafe fn rust_helper_req_bvec(rq: *mut request) -> bio_vec {
        host::req_bvec(rq)
    }

    /// Driver payload that trails `rq`.
    ///
    /// # Safety
    ///
    /// `rq` must come from a tag set with a non-zero `cmd_size`.
    pub unsafe fn rust_helper_blk_mq_rq_to_pdu(rq: *mut request) -> *mut c_void {
        host::blk_mq_rq_to_pdu(rq)
    }

    /// Inverse of [`rust_helper_blk_mq_rq_to_pdu`].
    ///
    /// # Safety
    ///
    /// `pdu` must have been obtained from `blk_mq_rq_to_pdu`.
    pub unsafe fn rust_helper_blk_mq_rq_from_pdu(pdu: *mut c_void) -> *mut request {
        host::blk_mq_rq_from_pdu(pdu)
    }

    /// Advance `iter` by `bytes` within the current segment.
    ///
    /// # Safety
    ///
    /// `bytes` must not cross the end of the current segment.
    pub unsafe fn rust_helper_bio_advance_iter_single(
        bio: *const bio,
        iter: *mut bvec_iter,
        bytes: c_uint,
    ) {
        host::bio_advance_iter_single(bio, iter, bytes)
    }

    /// Linux equivalent: `__blk_mq_free_request(req)`
    ///
    /// # Safety
    ///
    /// The last reference to `req` must already have been dropped.
    pub unsafe fn rust_helper_blk_mq_free_request_internal(req: *mut request) {
        host::__blk_mq_free_request(req)
    }

    /// # Safety
    ///
    /// `tags` must be a live tag map.
    pub unsafe fn rust_helper_blk_mq_tag_to_rq(tags: *mut blk_mq_tags, tag: c_uint) -> *mut request {
        host::blk_mq_tag_to_rq(tags, tag)
    }

    /// # Safety
    ///
    /// `rq` must be a live request.
    pub unsafe fn rust_helper_blk_rq_payload_bytes(rq: *mut request) -> c_uint {
        host::blk_rq_payload_bytes(rq)
    }

    /// # Safety
    ///
    /// `rq` must be a live request.
    pub unsafe fn rust_helper_blk_rq_nr_phys_segments(rq: *mut request) -> c_ushort {
        host::blk_rq_nr_phys_segments(rq)
    }
}
