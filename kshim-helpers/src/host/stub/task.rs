//! Tasks and wait-queue entries
//!
//! Each thread gets its own leaked [`StubTask`], so `current` differs across
//! threads and stays put within one.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use kshim_ffi::{c_uint, c_void, list_head, task_struct, wait_queue_entry};

#[repr(C)]
pub struct StubTask {
    pub usage: AtomicI32,
    pub sigpending: AtomicBool,
    pub freed: AtomicBool,
}

impl StubTask {
    pub fn new() -> Self {
        Self {
            usage: AtomicI32::new(1),
            sigpending: AtomicBool::new(false),
            freed: AtomicBool::new(false),
        }
    }

    pub fn as_ptr(&self) -> *mut task_struct {
        self as *const Self as *mut task_struct
    }

    pub fn usage(&self) -> i32 {
        self.usage.load(Ordering::SeqCst)
    }

    pub fn raise_signal(&self) {
        self.sigpending.store(true, Ordering::SeqCst);
    }

    pub fn is_freed(&self) -> bool {
        self.freed.load(Ordering::SeqCst)
    }
}

impl Default for StubTask {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CURRENT: &'static StubTask = Box::leak(Box::new(StubTask::new()));
}

/// The stub task backing `current` on this thread
pub fn current_task() -> &'static StubTask {
    CURRENT.with(|t| *t)
}

/// Callback `init_wait` installs (`autoremove_wake_function` on the host)
pub unsafe extern "C" fn autoremove_wake_function(
    _wq_entry: *mut wait_queue_entry,
    _mode: c_uint,
    _sync: i32,
    _key: *mut c_void,
) -> i32 {
    1
}

pub type WaitQueueFunc =
    unsafe extern "C" fn(*mut wait_queue_entry, c_uint, i32, *mut c_void) -> i32;

/// Layout of `struct wait_queue_entry`
#[repr(C)]
pub struct StubWaitEntry {
    pub flags: c_uint,
    pub private: *mut c_void,
    pub func: Option<WaitQueueFunc>,
    pub entry: list_head,
}

impl StubWaitEntry {
    pub fn new() -> Self {
        Self {
            flags: 0xffff,
            private: std::ptr::null_mut(),
            func: None,
            entry: list_head::new(),
        }
    }

    pub fn as_mut_ptr(&mut self) -> *mut wait_queue_entry {
        self as *mut Self as *mut wait_queue_entry
    }
}

impl Default for StubWaitEntry {
    fn default() -> Self {
        Self::new()
    }
}

pub mod primitives {
    use std::sync::atomic::Ordering;

    use kshim_ffi::{c_int, sync::init_list_head, task_struct, wait_queue_entry};

    use super::{autoremove_wake_function, current_task, StubTask, StubWaitEntry};
    use crate::host::stub::{record, Word};

    unsafe fn stub_task<'a>(t: *mut task_struct) -> &'a StubTask {
        &*t.cast::<StubTask>()
    }

    pub unsafe fn get_current() -> *mut task_struct {
        record("get_current", []);
        current_task().as_ptr()
    }

    pub unsafe fn get_task_struct(t: *mut task_struct) {
        record("get_task_struct", [t.word()]);
        stub_task(t).usage.fetch_add(1, Ordering::Relaxed);
    }

    pub unsafe fn put_task_struct(t: *mut task_struct) {
        record("put_task_struct", [t.word()]);
        let task = stub_task(t);
        if task.usage.fetch_sub(1, Ordering::AcqRel) == 1 {
            task.freed.store(true, Ordering::SeqCst);
        }
    }

    pub unsafe fn signal_pending(t: *mut task_struct) -> c_int {
        record("signal_pending", [t.word()]);
        c_int::from(stub_task(t).sigpending.load(Ordering::SeqCst))
    }

    pub unsafe fn init_wait(wq_entry: *mut wait_queue_entry) {
        record("init_wait", [wq_entry.word()]);
        let entry = &mut *wq_entry.cast::<StubWaitEntry>();
        entry.private = current_task().as_ptr().cast();
        entry.func = Some(autoremove_wake_function);
        init_list_head(&mut entry.entry);
        entry.flags = 0;
    }
}
