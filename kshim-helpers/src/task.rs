//! Task and scheduling accessors

use kshim_ffi::{c_int, c_uint, task_struct, wait_queue_entry};

use crate::host;

export! {
    /// The running task.
    ///
    /// Linux equivalent: `current`. Fetched from the host on every call;
    /// the value differs across threads and must never be cached.
    ///
    /// # Safety
    ///
    /// Must be called from task context.
    pub unsafe fn rust_helper_get_current() -> *mut task_struct {
        host::get_current()
    }

    /// # Safety
    ///
    /// The caller must hold a reference on `t` or be running as `t`.
    pub unsafe fn rust_helper_get_task_struct(t: *mut task_struct) {
        host::get_task_struct(t)
    }

    /// # Safety
    ///
    /// The caller must own the reference being dropped.
    pub unsafe fn rust_helper_put_task_struct(t: *mut task_struct) {
        host::put_task_struct(t)
    }

    /// # Safety
    ///
    /// `t` must be live.
    pub unsafe fn rust_helper_signal_pending(t: *mut task_struct) -> c_int {
        host::signal_pending(t)
    }

    /// Prepare `wq_entry` to wait on behalf of the current task.
    ///
    /// # Safety
    ///
    /// `wq_entry` must not be queued.
    pub unsafe fn rust_helper_init_wait(wq_entry: *mut wait_queue_entry) {
        host::init_wait(wq_entry)
    }

    /// Busy-wait `ms` milliseconds.
    ///
    /// # Safety
    ///
    /// Always safe; spins the CPU.
    pub unsafe fn rust_helper_mdelay(ms: u64) {
        host::mdelay(ms)
    }

    /// # Safety
    ///
    /// Always safe.
    pub unsafe fn rust_helper_num_possible_cpus() -> c_uint {
        host::num_possible_cpus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::stub::{
        delayed_ms, set_possible_cpus, take_calls, task::current_task, StubTask, StubWaitEntry,
    };

    #[test]
    fn test_current_is_refetched_each_call() {
        take_calls();
        let a = unsafe { rust_helper_get_current() };
        let b = unsafe { rust_helper_get_current() };

        assert_eq!(a, b);
        assert_eq!(a, current_task().as_ptr());
        assert_eq!(take_calls().len(), 2);
    }

    #[test]
    fn test_task_reference_pair() {
        let task = StubTask::new();
        unsafe {
            rust_helper_get_task_struct(task.as_ptr());
            assert_eq!(task.usage(), 2);
            rust_helper_put_task_struct(task.as_ptr());
        }
        assert_eq!(task.usage(), 1);
        assert!(!task.is_freed());
    }

    #[test]
    fn test_signal_pending() {
        let task = StubTask::new();
        assert_eq!(unsafe { rust_helper_signal_pending(task.as_ptr()) }, 0);
        task.raise_signal();
        assert_eq!(unsafe { rust_helper_signal_pending(task.as_ptr()) }, 1);
    }

    #[test]
    fn test_init_wait_targets_current() {
        let mut entry = StubWaitEntry::new();
        unsafe { rust_helper_init_wait(entry.as_mut_ptr()) };
        assert_eq!(entry.private, current_task().as_ptr().cast::<kshim_ffi::c_void>());
        assert!(entry.func.is_some());
    }

    #[test]
    fn test_mdelay_and_cpus() {
        let before = delayed_ms();
        set_possible_cpus(16);
        unsafe {
            rust_helper_mdelay(3);
            assert_eq!(rust_helper_num_possible_cpus(), 16);
        }
        assert_eq!(delayed_ms() - before, 3);
    }
}
