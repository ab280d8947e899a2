//! Work item initialisation
//!
//! `INIT_WORK` is a macro that plants a static lockdep key at each call site.
//! The helper takes the key and name from the caller and performs the same
//! steps as the host's `__INIT_WORK_KEY`.

use core::ptr::addr_of_mut;

use kshim_ffi::{
    atomic_long_t, c_char, c_int, lock_class_key, sync::init_list_head, work_func_t,
    work_struct, WORK_DATA_INIT,
};

use crate::host;

export! {
    /// Initialise `work` to run `func`.
    ///
    /// Steps, in order: `__init_work`, reset `data` to `WORK_DATA_INIT()`,
    /// register the lockdep map under `key`, empty the `entry` list, store
    /// `func`.
    ///
    /// # Safety
    ///
    /// `work` must be writable and not queued. `name` and `key` must outlive
    /// the work item.
    pub unsafe fn rust_helper_init_work_with_key(
        work: *mut work_struct,
        func: work_func_t,
        onstack: bool,
        name: *const c_char,
        key: *mut lock_class_key,
    ) {
        host::__init_work(work, c_int::from(onstack));
        addr_of_mut!((*work).data).write(atomic_long_t::new(WORK_DATA_INIT));
        host::lockdep_init_map(addr_of_mut!((*work).lockdep_map), name, key, 0);
        init_list_head(addr_of_mut!((*work).entry));
        addr_of_mut!((*work).func).write(func);
    }
}
