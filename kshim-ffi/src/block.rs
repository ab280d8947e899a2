//! Block layer value types
//!
//! `bio_vec` is returned by value from `rust_helper_req_bvec` and `bvec_iter`
//! is advanced in place by `rust_helper_bio_advance_iter_single`, so both need
//! their real layout on this side.

use crate::handles::page;
use crate::types::sector_t;

/// Matches `struct bio_vec`:
/// ```c
/// struct bio_vec {
///     struct page  *bv_page;
///     unsigned int  bv_len;
///     unsigned int  bv_offset;
/// };
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct bio_vec {
    pub bv_page: *mut page,
    pub bv_len: u32,
    pub bv_offset: u32,
}

impl bio_vec {
    pub const fn empty() -> Self {
        Self {
            bv_page: core::ptr::null_mut(),
            bv_len: 0,
            bv_offset: 0,
        }
    }
}

/// Matches `struct bvec_iter`
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct bvec_iter {
    /// device address in 512 byte sectors
    pub bi_sector: sector_t,
    /// residual I/O count
    pub bi_size: u32,
    /// current index into bvl_vec
    pub bi_idx: u32,
    /// number of bytes completed in current bvec
    pub bi_bvec_done: u32,
}
