//! Block layer objects
//!
//! A [`StubRequest`] is followed in memory by its driver PDU, the way
//! `blk-mq` allocates `sizeof(struct request) + cmd_size`.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use kshim_ffi::{bio, bio_vec, blk_mq_tags, request};

/// Bytes of driver PDU behind every stub request
pub const STUB_PDU_SIZE: usize = 64;

#[repr(C)]
pub struct RequestHeader {
    pub refs: AtomicI32,
    pub payload_bytes: u32,
    pub nr_phys_segments: u16,
    pub bvec: bio_vec,
    pub freed: AtomicBool,
}

#[repr(C)]
pub struct StubRequest {
    pub header: RequestHeader,
    pub pdu: [u8; STUB_PDU_SIZE],
}

impl StubRequest {
    pub fn new(refs: i32) -> Box<Self> {
        Box::new(Self {
            header: RequestHeader {
                refs: AtomicI32::new(refs),
                payload_bytes: 0,
                nr_phys_segments: 0,
                bvec: bio_vec::empty(),
                freed: AtomicBool::new(false),
            },
            pdu: [0; STUB_PDU_SIZE],
        })
    }

    pub fn as_ptr(&self) -> *mut request {
        self as *const Self as *mut request
    }

    pub fn pdu_ptr(&self) -> *mut u8 {
        self.pdu.as_ptr() as *mut u8
    }

    pub fn refs(&self) -> i32 {
        self.header.refs.load(Ordering::SeqCst)
    }

    pub fn is_freed(&self) -> bool {
        self.header.freed.load(Ordering::SeqCst)
    }
}

/// A bio over a fixed vector of segments
#[repr(C)]
pub struct StubBio {
    pub vecs: Vec<bio_vec>,
}

impl StubBio {
    pub fn new(vecs: Vec<bio_vec>) -> Self {
        Self { vecs }
    }

    pub fn as_ptr(&self) -> *const bio {
        self as *const Self as *const bio
    }
}

#[repr(C)]
pub struct StubTags {
    pub rqs: Vec<*mut request>,
}

impl StubTags {
    pub fn new(rqs: Vec<*mut request>) -> Self {
        Self { rqs }
    }

    pub fn as_ptr(&self) -> *mut blk_mq_tags {
        self as *const Self as *mut blk_mq_tags
    }
}

unsafe fn header<'a>(rq: *mut request) -> &'a RequestHeader {
    &*rq.cast::<RequestHeader>()
}

pub mod primitives {
    use std::sync::atomic::Ordering;

    use kshim_ffi::{bio, bio_vec, blk_mq_tags, bvec_iter, c_uint, c_ushort, c_void, request};

    use super::{header, RequestHeader, StubBio, StubTags};
    use crate::host::stub::{record, Word};

    pub unsafe fn req_bvec(rq: *mut request) -> bio_vec {
        record("req_bvec", [rq.word()]);
        header(rq).bvec
    }

    pub unsafe fn blk_mq_rq_to_pdu(rq: *mut request) -> *mut c_void {
        record("blk_mq_rq_to_pdu", [rq.word()]);
        rq.cast::<RequestHeader>().add(1).cast()
    }

    pub unsafe fn blk_mq_rq_from_pdu(pdu: *mut c_void) -> *mut request {
        record("blk_mq_rq_from_pdu", [pdu.word()]);
        pdu.cast::<RequestHeader>().sub(1).cast()
    }

    pub unsafe fn bio_advance_iter_single(bio: *const bio, iter: *mut bvec_iter, bytes: c_uint) {
        record("bio_advance_iter_single", [bio.word(), iter.word(), bytes.word()]);
        let bio = &*bio.cast::<StubBio>();
        let iter = &mut *iter;

        // Over-long advances are clamped, not trapped.
        iter.bi_sector += u64::from(bytes >> 9);
        let mut done = iter.bi_bvec_done.saturating_add(bytes);
        let seg_len = bio.vecs.get(iter.bi_idx as usize).map(|bv| bv.bv_len);
        if seg_len.is_some_and(|len| done >= len) {
            done = 0;
            iter.bi_idx += 1;
        }
        iter.bi_bvec_done = done;
        iter.bi_size = iter.bi_size.saturating_sub(bytes);
    }

    pub unsafe fn req_ref_inc_not_zero(req: *mut request) -> bool {
        record("req_ref_inc_not_zero", [req.word()]);
        header(req)
            .refs
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |refs| {
                (refs != 0).then_some(refs + 1)
            })
            .is_ok()
    }

    pub unsafe fn req_ref_put_and_test(req: *mut request) -> bool {
        record("req_ref_put_and_test", [req.word()]);
        header(req).refs.fetch_sub(1, Ordering::AcqRel) == 1
    }

    pub unsafe fn __blk_mq_free_request(req: *mut request) {
        record("__blk_mq_free_request", [req.word()]);
        header(req).freed.store(true, Ordering::SeqCst);
    }

    pub unsafe fn blk_mq_tag_to_rq(tags: *mut blk_mq_tags, tag: c_uint) -> *mut request {
        record("blk_mq_tag_to_rq", [tags.word(), tag.word()]);
        let tags = &*tags.cast::<StubTags>();
        tags.rqs
            .get(tag as usize)
            .copied()
            .unwrap_or(std::ptr::null_mut())
    }

    pub unsafe fn blk_rq_payload_bytes(rq: *mut request) -> c_uint {
        record("blk_rq_payload_bytes", [rq.word()]);
        header(rq).payload_bytes
    }

    pub unsafe fn blk_rq_nr_phys_segments(rq: *mut request) -> c_ushort {
        record("blk_rq_nr_phys_segments", [rq.word()]);
        header(rq).nr_phys_segments
    }
}
