//! Spinlocks
//!
//! `spin_lock_init` is a macro that declares a static lock class at the call
//! site. A foreign caller cannot do that, so the helper takes the class name
//! and key from the caller instead. Without `CONFIG_DEBUG_SPINLOCK` the host
//! ignores lockdep classes and the plain initialiser is used.

use kshim_ffi::{c_char, lock_class_key, spinlock_t};

use crate::host;

export! {
    /// Initialise `lock` under the lockdep class `key`.
    ///
    /// # Safety
    ///
    /// `lock` must be unlocked and not in use. `name` and `key` must outlive
    /// the lock.
    pub unsafe fn rust_helper___spin_lock_init(
        lock: *mut spinlock_t,
        name: *const c_char,
        key: *mut lock_class_key,
    ) {
        init(lock, name, key)
    }

    /// # Safety
    ///
    /// `lock` must be initialised; must not be called with `lock` held.
    pub unsafe fn rust_helper_spin_lock(lock: *mut spinlock_t) {
        host::spin_lock(lock)
    }

    /// # Safety
    ///
    /// The caller must hold `lock`.
    pub unsafe fn rust_helper_spin_unlock(lock: *mut spinlock_t) {
        host::spin_unlock(lock)
    }
}

#[cfg(CONFIG_DEBUG_SPINLOCK)]
#[inline(always)]
unsafe fn init(lock: *mut spinlock_t, name: *const c_char, key: *mut lock_class_key) {
    host::__raw_spin_lock_init(
        lock.cast::<kshim_ffi::raw_spinlock_t>(),
        name,
        key,
        kshim_ffi::LD_WAIT_CONFIG,
    )
}

#[cfg(not(CONFIG_DEBUG_SPINLOCK))]
#[inline(always)]
unsafe fn init(lock: *mut spinlock_t, _name: *const c_char, _key: *mut lock_class_key) {
    host::spin_lock_init(lock)
}
