//! RCU read-side critical sections

use crate::host;

export! {
    /// # Safety
    ///
    /// Must be balanced by [`rust_helper_rcu_read_unlock`] on the same CPU
    /// context. Must not block inside the section.
    pub unsafe fn rust_helper_rcu_read_lock() {
        host::rcu_read_lock()
    }

    /// # Safety
    ///
    /// Must close a section opened by [`rust_helper_rcu_read_lock`].
    pub unsafe fn rust_helper_rcu_read_unlock() {
        host::rcu_read_unlock()
    }
}
