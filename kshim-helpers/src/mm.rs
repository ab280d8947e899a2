//! Folio and page helpers
//!
//! Reference counting, flag updates and temporary kernel mappings on folios
//! and pages.

use kshim_ffi::{c_uint, c_void, folio, gfp_t, loff_t, page, size_t};

use crate::host;

export! {
    /// # Safety
    ///
    /// The caller must already hold a reference on `folio`.
    pub unsafe fn rust_helper_folio_get(folio: *mut folio) {
        host::folio_get(folio)
    }

    /// Drop a reference; the folio may be freed before this returns.
    ///
    /// # Safety
    ///
    /// The caller must own the reference being dropped.
    pub unsafe fn rust_helper_folio_put(folio: *mut folio) {
        host::folio_put(folio)
    }

    /// # Safety
    ///
    /// `n` must be below the number of pages in `folio`.
    pub unsafe fn rust_helper_folio_page(folio: *mut folio, n: size_t) -> *mut page {
        host::folio_page(folio, n)
    }

    /// # Safety
    ///
    /// `folio` must be in the page cache.
    pub unsafe fn rust_helper_folio_pos(folio: *mut folio) -> loff_t {
        host::folio_pos(folio)
    }

    /// # Safety
    ///
    /// `folio` must be live.
    pub unsafe fn rust_helper_folio_size(folio: *mut folio) -> size_t {
        host::folio_size(folio)
    }

    /// # Safety
    ///
    /// `folio` must be locked by the caller.
    pub unsafe fn rust_helper_folio_mark_uptodate(folio: *mut folio) {
        host::folio_mark_uptodate(folio)
    }

    /// # Safety
    ///
    /// `folio` must be live.
    pub unsafe fn rust_helper_folio_set_error(folio: *mut folio) {
        host::folio_set_error(folio)
    }

    /// # Safety
    ///
    /// `folio` must be live.
    pub unsafe fn rust_helper_flush_dcache_folio(folio: *mut folio) {
        host::flush_dcache_folio(folio)
    }

    /// Map the page holding byte `offset` of `folio`.
    ///
    /// # Safety
    ///
    /// Unmap with [`rust_helper_kunmap_local`], in reverse mapping order and
    /// on the same thread.
    pub unsafe fn rust_helper_kmap_local_folio(folio: *mut folio, offset: size_t) -> *mut c_void {
        host::kmap_local_folio(folio, offset)
    }

    /// # Safety
    ///
    /// Balance with [`rust_helper_kunmap`]. May sleep.
    pub unsafe fn rust_helper_kmap(page: *mut page) -> *mut c_void {
        host::kmap(page)
    }

    /// # Safety
    ///
    /// `page` must be mapped by [`rust_helper_kmap`].
    pub unsafe fn rust_helper_kunmap(page: *mut page) {
        host::kunmap(page)
    }

    /// # Safety
    ///
    /// `gfp_mask` must be valid for the calling context.
    pub unsafe fn rust_helper_alloc_pages(gfp_mask: gfp_t, order: c_uint) -> *mut page {
        host::alloc_pages(gfp_mask, order)
    }

    /// # Safety
    ///
    /// Unmap with [`rust_helper_kunmap_local`] on the same thread.
    pub unsafe fn rust_helper_kmap_local_page(page: *mut page) -> *mut c_void {
        host::kmap_local_page(page)
    }

    /// # Safety
    ///
    /// `addr` must lie in the most recent local mapping still held.
    pub unsafe fn rust_helper_kunmap_local(addr: *const c_void) {
        host::kunmap_local(addr)
    }
}

// NUMA hosts route folio allocation through the mempolicy path, which has no
// inline form to wrap.
#[cfg(not(CONFIG_NUMA))]
export! {
    /// # Safety
    ///
    /// `gfp` must be valid for the calling context.
    pub unsafe fn rust_helper_folio_alloc(gfp: gfp_t, order: c_uint) -> *mut folio {
        host::folio_alloc(gfp, order)
    }
}
