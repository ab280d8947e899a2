//! Workqueue bookkeeping, timing and diagnostics

use std::cell::Cell;

use kshim_ffi::kunit;

thread_local! {
    static POSSIBLE_CPUS: Cell<u32> = const { Cell::new(4) };
    static DELAYED_MS: Cell<u64> = const { Cell::new(0) };
    static CURRENT_TEST: Cell<*mut kunit> = const { Cell::new(std::ptr::null_mut()) };
}

/// Set what `num_possible_cpus` reports on this thread
pub fn set_possible_cpus(n: u32) {
    POSSIBLE_CPUS.with(|c| c.set(n));
}

/// Total busy-wait requested through `mdelay` on this thread
pub fn delayed_ms() -> u64 {
    DELAYED_MS.with(Cell::get)
}

/// Mark `test` as the running KUnit case on this thread
pub fn set_current_test(test: *mut kunit) {
    CURRENT_TEST.with(|c| c.set(test));
}

pub fn clear_current_test() {
    set_current_test(std::ptr::null_mut());
}

pub mod primitives {
    #![allow(non_snake_case)]

    use kshim_ffi::{
        c_char, c_int, c_uint, lock_class_key, lockdep_map, work_struct, KernelError,
    };

    use super::{DELAYED_MS, POSSIBLE_CPUS};
    use crate::host::stub::{record, Word};

    pub unsafe fn __init_work(work: *mut work_struct, onstack: c_int) {
        record("__init_work", [work.word(), onstack.word()]);
    }

    pub unsafe fn lockdep_init_map(
        lock: *mut lockdep_map,
        name: *const c_char,
        key: *mut lock_class_key,
        subclass: c_int,
    ) {
        record(
            "lockdep_init_map",
            [lock.word(), name.word(), key.word(), subclass.word()],
        );
    }

    pub unsafe fn mdelay(ms: u64) {
        record("mdelay", [ms]);
        DELAYED_MS.with(|d| d.set(d.get() + ms));
    }

    pub unsafe fn num_possible_cpus() -> c_uint {
        record("num_possible_cpus", []);
        POSSIBLE_CPUS.with(|c| c.get())
    }

    pub unsafe fn errname(err: c_int) -> *const c_char {
        record("errname", [err.word()]);
        KernelError::from_errno(err)
            .map(|e| e.name().as_ptr())
            .unwrap_or(std::ptr::null())
    }

    #[cfg(CONFIG_KUNIT)]
    pub unsafe fn kunit_get_current_test() -> *mut kshim_ffi::kunit {
        record("kunit_get_current_test", []);
        super::CURRENT_TEST.with(|c| c.get())
    }

    pub unsafe fn BUG() -> ! {
        record("BUG", []);
        panic!("kernel BUG");
    }
}
