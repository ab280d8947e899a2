//! Host primitives as the kernel build exposes them

#![allow(non_snake_case)]

use kshim_ffi::{
    bio, bio_vec, blk_mq_tags, bvec_iter, c_char, c_int, c_uint, c_ushort, c_void, device,
    folio, gfp_t, lock_class_key, lockdep_map, lockdep_wait_type, loff_t, mutex, page,
    pci_dev, raw_spinlock_t, refcount_t, request, resource_size_t, size_t, spinlock_t,
    task_struct, wait_queue_entry, work_struct,
};

extern "C" {
    // block
    pub fn req_bvec(rq: *mut request) -> bio_vec;
    pub fn blk_mq_rq_to_pdu(rq: *mut request) -> *mut c_void;
    pub fn blk_mq_rq_from_pdu(pdu: *mut c_void) -> *mut request;
    pub fn bio_advance_iter_single(bio: *const bio, iter: *mut bvec_iter, bytes: c_uint);
    pub fn req_ref_inc_not_zero(req: *mut request) -> bool;
    pub fn req_ref_put_and_test(req: *mut request) -> bool;
    pub fn __blk_mq_free_request(req: *mut request);
    pub fn blk_mq_tag_to_rq(tags: *mut blk_mq_tags, tag: c_uint) -> *mut request;
    pub fn blk_rq_payload_bytes(rq: *mut request) -> c_uint;
    pub fn blk_rq_nr_phys_segments(rq: *mut request) -> c_ushort;

    // refcount
    pub fn refcount_inc(r: *mut refcount_t);
    pub fn refcount_dec_and_test(r: *mut refcount_t) -> bool;

    // mutex / spinlock
    pub fn __mutex_init(lock: *mut mutex, name: *const c_char, key: *mut lock_class_key);
    pub fn mutex_lock(lock: *mut mutex);
    pub fn mutex_unlock(lock: *mut mutex);
    pub fn spin_lock_init(lock: *mut spinlock_t);
    pub fn __raw_spin_lock_init(
        lock: *mut raw_spinlock_t,
        name: *const c_char,
        key: *mut lock_class_key,
        inner: lockdep_wait_type,
    );
    pub fn spin_lock(lock: *mut spinlock_t);
    pub fn spin_unlock(lock: *mut spinlock_t);

    // rcu
    pub fn rcu_read_lock();
    pub fn rcu_read_unlock();

    // io.h
    pub fn readb(addr: *const c_void) -> u8;
    pub fn readw(addr: *const c_void) -> u16;
    pub fn readl(addr: *const c_void) -> u32;
    #[cfg(CONFIG_64BIT)]
    pub fn readq(addr: *const c_void) -> u64;
    pub fn writeb(value: u8, addr: *mut c_void);
    pub fn writew(value: u16, addr: *mut c_void);
    pub fn writel(value: u32, addr: *mut c_void);
    #[cfg(CONFIG_64BIT)]
    pub fn writeq(value: u64, addr: *mut c_void);
    pub fn readb_relaxed(addr: *const c_void) -> u8;
    pub fn readw_relaxed(addr: *const c_void) -> u16;
    pub fn readl_relaxed(addr: *const c_void) -> u32;
    #[cfg(CONFIG_64BIT)]
    pub fn readq_relaxed(addr: *const c_void) -> u64;
    pub fn writeb_relaxed(value: u8, addr: *mut c_void);
    pub fn writew_relaxed(value: u16, addr: *mut c_void);
    pub fn writel_relaxed(value: u32, addr: *mut c_void);
    #[cfg(CONFIG_64BIT)]
    pub fn writeq_relaxed(value: u64, addr: *mut c_void);
    pub fn memcpy_fromio(to: *mut c_void, from: *const c_void, count: size_t);

    // mm
    pub fn folio_get(folio: *mut folio);
    pub fn folio_put(folio: *mut folio);
    pub fn folio_page(folio: *mut folio, n: size_t) -> *mut page;
    pub fn folio_pos(folio: *mut folio) -> loff_t;
    pub fn folio_size(folio: *mut folio) -> size_t;
    pub fn folio_mark_uptodate(folio: *mut folio);
    pub fn folio_set_error(folio: *mut folio);
    #[cfg(not(CONFIG_NUMA))]
    pub fn folio_alloc(gfp: gfp_t, order: c_uint) -> *mut folio;
    pub fn flush_dcache_folio(folio: *mut folio);
    pub fn kmap_local_folio(folio: *mut folio, offset: size_t) -> *mut c_void;
    pub fn kmap(page: *mut page) -> *mut c_void;
    pub fn kunmap(page: *mut page);
    pub fn alloc_pages(gfp_mask: gfp_t, order: c_uint) -> *mut page;
    pub fn kmap_local_page(page: *mut page) -> *mut c_void;
    pub fn kunmap_local(addr: *const c_void);

    // sched
    pub fn get_current() -> *mut task_struct;
    pub fn get_task_struct(t: *mut task_struct);
    pub fn put_task_struct(t: *mut task_struct);
    pub fn signal_pending(t: *mut task_struct) -> c_int;
    pub fn init_wait(wq_entry: *mut wait_queue_entry);
    pub fn mdelay(ms: u64);
    pub fn num_possible_cpus() -> c_uint;

    // device / pci
    pub fn dev_get_drvdata(dev: *const device) -> *mut c_void;
    pub fn dev_set_drvdata(dev: *mut device, data: *mut c_void);
    pub fn dev_name(dev: *const device) -> *const c_char;
    pub fn pci_get_drvdata(pdev: *mut pci_dev) -> *mut c_void;
    pub fn pci_set_drvdata(pdev: *mut pci_dev, data: *mut c_void);
    pub fn pci_resource_start(pdev: *mut pci_dev, bar: c_int) -> resource_size_t;

    // workqueue
    pub fn __init_work(work: *mut work_struct, onstack: c_int);
    pub fn lockdep_init_map(
        lock: *mut lockdep_map,
        name: *const c_char,
        key: *mut lock_class_key,
        subclass: c_int,
    );

    // diagnostics
    pub fn errname(err: c_int) -> *const c_char;
    #[cfg(CONFIG_KUNIT)]
    pub fn kunit_get_current_test() -> *mut kshim_ffi::kunit;
    pub fn BUG() -> !;
}
