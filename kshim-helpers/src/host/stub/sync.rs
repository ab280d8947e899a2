//! Locks, refcounts and RCU read-side sections
//!
//! Stub mutexes yield while contended (the host sleeps); stub spinlocks
//! busy-wait. Lock and unlock are separate calls on the host, so the guard
//! from `spin` is forgotten on lock and the lock force-released on unlock.

use std::cell::Cell;
use std::sync::atomic::{AtomicI32, AtomicPtr, AtomicU32, Ordering};

use kshim_ffi::{c_char, lock_class_key, lockdep_wait_type, mutex, spinlock_t};
use spin::mutex::SpinMutex;
use spin::relax::{Spin, Yield};

/// Lock class a lock was initialised with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockClass {
    pub name: *const c_char,
    pub key: *mut lock_class_key,
}

#[repr(C)]
pub struct StubMutex {
    inner: SpinMutex<(), Yield>,
    name: AtomicPtr<c_char>,
    key: AtomicPtr<lock_class_key>,
    acquisitions: AtomicU32,
}

impl StubMutex {
    pub const fn new() -> Self {
        Self {
            inner: SpinMutex::new(()),
            name: AtomicPtr::new(std::ptr::null_mut()),
            key: AtomicPtr::new(std::ptr::null_mut()),
            acquisitions: AtomicU32::new(0),
        }
    }

    pub fn as_ptr(&self) -> *mut mutex {
        self as *const Self as *mut mutex
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn class(&self) -> LockClass {
        LockClass {
            name: self.name.load(Ordering::SeqCst),
            key: self.key.load(Ordering::SeqCst),
        }
    }
}

impl Default for StubMutex {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
pub struct StubSpinlock {
    inner: SpinMutex<(), Spin>,
    name: AtomicPtr<c_char>,
    key: AtomicPtr<lock_class_key>,
    wait_type: AtomicI32,
    acquisitions: AtomicU32,
}

impl StubSpinlock {
    pub const fn new() -> Self {
        Self {
            inner: SpinMutex::new(()),
            name: AtomicPtr::new(std::ptr::null_mut()),
            key: AtomicPtr::new(std::ptr::null_mut()),
            wait_type: AtomicI32::new(-1),
            acquisitions: AtomicU32::new(0),
        }
    }

    pub fn as_ptr(&self) -> *mut spinlock_t {
        self as *const Self as *mut spinlock_t
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn class(&self) -> LockClass {
        LockClass {
            name: self.name.load(Ordering::SeqCst),
            key: self.key.load(Ordering::SeqCst),
        }
    }

    /// Wait type from `__raw_spin_lock_init`, `None` after a plain init
    pub fn wait_type(&self) -> Option<lockdep_wait_type> {
        let w = self.wait_type.load(Ordering::SeqCst);
        (w >= 0).then_some(w)
    }
}

impl Default for StubSpinlock {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static RCU_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// RCU read-side nesting depth on this thread
pub fn rcu_read_depth() -> u32 {
    RCU_DEPTH.with(Cell::get)
}

/// `REFCOUNT_SATURATED`
pub const REFCOUNT_SATURATED: i32 = i32::MIN / 2;

pub mod primitives {
    use std::sync::atomic::{fence, Ordering};

    use kshim_ffi::{c_char, lock_class_key, lockdep_wait_type, mutex, raw_spinlock_t, refcount_t, spinlock_t};
    use tracing::warn;

    use super::{StubMutex, StubSpinlock, RCU_DEPTH, REFCOUNT_SATURATED};
    use crate::host::stub::{record, Word};

    unsafe fn stub_mutex<'a>(lock: *mut mutex) -> &'a StubMutex {
        &*lock.cast::<StubMutex>()
    }

    unsafe fn stub_spinlock<'a>(lock: *mut spinlock_t) -> &'a StubSpinlock {
        &*lock.cast::<StubSpinlock>()
    }

    pub unsafe fn __mutex_init(lock: *mut mutex, name: *const c_char, key: *mut lock_class_key) {
        record("__mutex_init", [lock.word(), name.word(), key.word()]);
        let m = stub_mutex(lock);
        m.name.store(name.cast_mut(), Ordering::SeqCst);
        m.key.store(key, Ordering::SeqCst);
    }

    pub unsafe fn mutex_lock(lock: *mut mutex) {
        record("mutex_lock", [lock.word()]);
        let m = stub_mutex(lock);
        core::mem::forget(m.inner.lock());
        m.acquisitions.fetch_add(1, Ordering::SeqCst);
    }

    pub unsafe fn mutex_unlock(lock: *mut mutex) {
        record("mutex_unlock", [lock.word()]);
        stub_mutex(lock).inner.force_unlock();
    }

    pub unsafe fn spin_lock_init(lock: *mut spinlock_t) {
        record("spin_lock_init", [lock.word()]);
        let s = stub_spinlock(lock);
        s.wait_type.store(-1, Ordering::SeqCst);
    }

    pub unsafe fn __raw_spin_lock_init(
        lock: *mut raw_spinlock_t,
        name: *const c_char,
        key: *mut lock_class_key,
        inner: lockdep_wait_type,
    ) {
        record(
            "__raw_spin_lock_init",
            [lock.word(), name.word(), key.word(), inner.word()],
        );
        let s = stub_spinlock(lock.cast());
        s.name.store(name.cast_mut(), Ordering::SeqCst);
        s.key.store(key, Ordering::SeqCst);
        s.wait_type.store(inner, Ordering::SeqCst);
    }

    pub unsafe fn spin_lock(lock: *mut spinlock_t) {
        record("spin_lock", [lock.word()]);
        let s = stub_spinlock(lock);
        core::mem::forget(s.inner.lock());
        s.acquisitions.fetch_add(1, Ordering::SeqCst);
    }

    pub unsafe fn spin_unlock(lock: *mut spinlock_t) {
        record("spin_unlock", [lock.word()]);
        stub_spinlock(lock).inner.force_unlock();
    }

    pub unsafe fn refcount_inc(r: *mut refcount_t) {
        record("refcount_inc", [r.word()]);
        let counter = &(*r).refs.counter;
        let old = counter.fetch_add(1, Ordering::Relaxed);
        if old == 0 {
            counter.store(REFCOUNT_SATURATED, Ordering::Relaxed);
            warn!("refcount_t: addition on 0; use-after-free.");
        } else if old < 0 || old.checked_add(1).is_none() {
            counter.store(REFCOUNT_SATURATED, Ordering::Relaxed);
            warn!("refcount_t: saturated; leaking memory.");
        }
    }

    pub unsafe fn refcount_dec_and_test(r: *mut refcount_t) -> bool {
        record("refcount_dec_and_test", [r.word()]);
        let counter = &(*r).refs.counter;
        let old = counter.fetch_sub(1, Ordering::Release);
        if old == 1 {
            fence(Ordering::Acquire);
            return true;
        }
        if old <= 0 {
            counter.store(REFCOUNT_SATURATED, Ordering::Relaxed);
            warn!("refcount_t: underflow; use-after-free.");
        }
        false
    }

    pub unsafe fn rcu_read_lock() {
        record("rcu_read_lock", []);
        RCU_DEPTH.with(|d| d.set(d.get() + 1));
    }

    pub unsafe fn rcu_read_unlock() {
        record("rcu_read_unlock", []);
        RCU_DEPTH.with(|d| match d.get().checked_sub(1) {
            Some(depth) => d.set(depth),
            None => warn!("rcu_read_unlock without matching rcu_read_lock"),
        });
    }
}
