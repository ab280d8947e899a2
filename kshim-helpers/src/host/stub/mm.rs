//! Folios and pages
//!
//! A [`StubFolio`] owns `2^order` pages. `kmap`/`kunmap` keep a per-page map
//! count; `kmap_local_*`/`kunmap_local` keep a per-thread stack, as the host
//! does for local mappings.

use std::cell::{RefCell, UnsafeCell};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use kshim_ffi::{c_void, folio, page};

pub const PAGE_SIZE: usize = 4096;

#[repr(C)]
pub struct StubPage {
    pub data: Box<UnsafeCell<[u8; PAGE_SIZE]>>,
    pub kmap_count: AtomicI32,
}

impl StubPage {
    fn new() -> Self {
        Self {
            data: Box::new(UnsafeCell::new([0; PAGE_SIZE])),
            kmap_count: AtomicI32::new(0),
        }
    }

    pub fn as_ptr(&self) -> *mut page {
        self as *const Self as *mut page
    }

    pub fn data_ptr(&self) -> *mut u8 {
        self.data.get().cast()
    }

    pub fn kmap_count(&self) -> i32 {
        self.kmap_count.load(Ordering::SeqCst)
    }
}

#[repr(C)]
pub struct StubFolio {
    pub refcount: AtomicI32,
    pub uptodate: AtomicBool,
    pub error: AtomicBool,
    pub freed: AtomicBool,
    pub dcache_flushes: AtomicU32,
    pub pos: i64,
    pub pages: Box<[StubPage]>,
}

impl StubFolio {
    pub fn new(order: u32, pos: i64) -> Box<Self> {
        Box::new(Self {
            refcount: AtomicI32::new(1),
            uptodate: AtomicBool::new(false),
            error: AtomicBool::new(false),
            freed: AtomicBool::new(false),
            dcache_flushes: AtomicU32::new(0),
            pos,
            pages: (0..1usize << order).map(|_| StubPage::new()).collect(),
        })
    }

    pub fn as_ptr(&self) -> *mut folio {
        self as *const Self as *mut folio
    }

    pub fn page(&self, n: usize) -> &StubPage {
        &self.pages[n]
    }

    pub fn refcount(&self) -> i32 {
        self.refcount.load(Ordering::SeqCst)
    }

    pub fn is_uptodate(&self) -> bool {
        self.uptodate.load(Ordering::SeqCst)
    }

    pub fn has_error(&self) -> bool {
        self.error.load(Ordering::SeqCst)
    }

    pub fn is_freed(&self) -> bool {
        self.freed.load(Ordering::SeqCst)
    }

    pub fn dcache_flushes(&self) -> u32 {
        self.dcache_flushes.load(Ordering::SeqCst)
    }

    /// Take back ownership of a folio the stub allocator handed out.
    ///
    /// # Safety
    /// `folio` must come from `folio_alloc` and not be reclaimed twice.
    pub unsafe fn reclaim(folio: *mut folio) -> Box<Self> {
        Box::from_raw(folio.cast())
    }

    /// Take back the folio behind the head page `alloc_pages` returned.
    ///
    /// # Safety
    /// `page` must be the head page returned by `alloc_pages` on this thread.
    pub unsafe fn reclaim_pages(page: *mut page) -> Option<Box<Self>> {
        let folio = HEAD_PAGES.with(|h| {
            let mut heads = h.borrow_mut();
            let idx = heads.iter().position(|(p, _)| *p == page)?;
            Some(heads.swap_remove(idx).1)
        })?;
        Some(Box::from_raw(folio))
    }
}

thread_local! {
    static LOCAL_MAPS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    static HEAD_PAGES: RefCell<Vec<(*mut page, *mut StubFolio)>> = const { RefCell::new(Vec::new()) };
}

/// Local mappings currently held by this thread
pub fn local_map_depth() -> usize {
    LOCAL_MAPS.with(|m| m.borrow().len())
}

fn leak_folio(order: u32) -> *mut StubFolio {
    Box::into_raw(StubFolio::new(order, 0))
}

unsafe fn stub_folio<'a>(folio: *mut folio) -> &'a StubFolio {
    &*folio.cast::<StubFolio>()
}

unsafe fn stub_page<'a>(page: *mut page) -> &'a StubPage {
    &*page.cast::<StubPage>()
}

unsafe fn map_local(page: &StubPage) -> *mut c_void {
    let addr = page.data_ptr();
    LOCAL_MAPS.with(|m| m.borrow_mut().push(addr as usize));
    addr.cast()
}

pub mod primitives {
    use std::sync::atomic::Ordering;

    use kshim_ffi::{c_uint, c_void, folio, gfp_t, loff_t, page, size_t};
    use tracing::warn;

    use super::*;
    use crate::host::stub::{record, Word};

    pub unsafe fn folio_get(folio: *mut folio) {
        record("folio_get", [folio.word()]);
        stub_folio(folio).refcount.fetch_add(1, Ordering::Relaxed);
    }

    pub unsafe fn folio_put(folio: *mut folio) {
        record("folio_put", [folio.word()]);
        let f = stub_folio(folio);
        if f.refcount.fetch_sub(1, Ordering::AcqRel) == 1 {
            f.freed.store(true, Ordering::SeqCst);
        }
    }

    pub unsafe fn folio_page(folio: *mut folio, n: size_t) -> *mut page {
        record("folio_page", [folio.word(), n.word()]);
        stub_folio(folio).pages.as_ptr().add(n) as *mut page
    }

    pub unsafe fn folio_pos(folio: *mut folio) -> loff_t {
        record("folio_pos", [folio.word()]);
        stub_folio(folio).pos
    }

    pub unsafe fn folio_size(folio: *mut folio) -> size_t {
        record("folio_size", [folio.word()]);
        stub_folio(folio).pages.len() * PAGE_SIZE
    }

    pub unsafe fn folio_mark_uptodate(folio: *mut folio) {
        record("folio_mark_uptodate", [folio.word()]);
        stub_folio(folio).uptodate.store(true, Ordering::Release);
    }

    pub unsafe fn folio_set_error(folio: *mut folio) {
        record("folio_set_error", [folio.word()]);
        stub_folio(folio).error.store(true, Ordering::SeqCst);
    }

    #[cfg(not(CONFIG_NUMA))]
    pub unsafe fn folio_alloc(gfp: gfp_t, order: c_uint) -> *mut folio {
        record("folio_alloc", [gfp.word(), order.word()]);
        leak_folio(order).cast()
    }

    pub unsafe fn flush_dcache_folio(folio: *mut folio) {
        record("flush_dcache_folio", [folio.word()]);
        stub_folio(folio).dcache_flushes.fetch_add(1, Ordering::SeqCst);
    }

    pub unsafe fn kmap_local_folio(folio: *mut folio, offset: size_t) -> *mut c_void {
        record("kmap_local_folio", [folio.word(), offset.word()]);
        let page = &stub_folio(folio).pages[offset / PAGE_SIZE];
        map_local(page).cast::<u8>().add(offset % PAGE_SIZE).cast()
    }

    pub unsafe fn kmap(page: *mut page) -> *mut c_void {
        record("kmap", [page.word()]);
        let p = stub_page(page);
        p.kmap_count.fetch_add(1, Ordering::SeqCst);
        p.data_ptr().cast()
    }

    pub unsafe fn kunmap(page: *mut page) {
        record("kunmap", [page.word()]);
        stub_page(page).kmap_count.fetch_sub(1, Ordering::SeqCst);
    }

    pub unsafe fn alloc_pages(gfp_mask: gfp_t, order: c_uint) -> *mut page {
        record("alloc_pages", [gfp_mask.word(), order.word()]);
        let folio = leak_folio(order);
        let head = (*folio).pages.as_ptr() as *mut page;
        HEAD_PAGES.with(|h| h.borrow_mut().push((head, folio)));
        head
    }

    pub unsafe fn kmap_local_page(page: *mut page) -> *mut c_void {
        record("kmap_local_page", [page.word()]);
        map_local(stub_page(page))
    }

    pub unsafe fn kunmap_local(addr: *const c_void) {
        record("kunmap_local", [addr.word()]);
        LOCAL_MAPS.with(|m| {
            let mut maps = m.borrow_mut();
            let addr = addr as usize;
            match maps.last() {
                Some(&base) if (base..base + PAGE_SIZE).contains(&addr) => {
                    maps.pop();
                }
                _ => warn!(addr, "kunmap_local out of order"),
            }
        });
    }
}
