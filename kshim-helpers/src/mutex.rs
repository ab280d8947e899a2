//! Sleeping locks

use kshim_ffi::{c_char, lock_class_key, mutex};

use crate::host;

export! {
    /// Initialise `lock` under the lockdep class `key`.
    ///
    /// Linux equivalent: `__mutex_init(lock, name, key)`
    ///
    /// # Safety
    ///
    /// `lock` must be unlocked and not in use. `name` and `key` must live for
    /// as long as the lock (normally statics).
    pub unsafe fn rust_helper___mutex_init(
        lock: *mut mutex,
        name: *const c_char,
        key: *mut lock_class_key,
    ) {
        host::__mutex_init(lock, name, key)
    }

    /// # Safety
    ///
    /// May sleep. `lock` must be initialised.
    pub unsafe fn rust_helper_mutex_lock(lock: *mut mutex) {
        host::mutex_lock(lock)
    }

    /// # Safety
    ///
    /// The calling task must hold `lock`.
    pub unsafe fn rust_helper_mutex_unlock(lock: *mut mutex) {
        host::mutex_unlock(lock)
    }
}
