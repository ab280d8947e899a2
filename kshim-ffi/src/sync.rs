//! Atomic counters and list linkage
//!
//! These match the kernel's `atomic_t`, `atomic_long_t`, `refcount_t` and
//! `struct list_head` bit for bit. The counters are modelled with the core
//! atomics, which share size and alignment with the plain integer.

use core::ptr;
use core::sync::atomic::{AtomicI32, AtomicIsize, Ordering};

/// `typedef struct { int counter; } atomic_t;`
#[repr(C)]
#[derive(Debug)]
pub struct atomic_t {
    pub counter: AtomicI32,
}

impl atomic_t {
    pub const fn new(n: i32) -> Self {
        Self {
            counter: AtomicI32::new(n),
        }
    }

    pub fn read(&self) -> i32 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// `atomic_long_t`: `atomic64_t` on 64-bit, `atomic_t` otherwise. Both are a
/// single `long`.
#[repr(C)]
#[derive(Debug)]
pub struct atomic_long_t {
    pub counter: AtomicIsize,
}

impl atomic_long_t {
    pub const fn new(n: isize) -> Self {
        Self {
            counter: AtomicIsize::new(n),
        }
    }

    pub fn read(&self) -> isize {
        self.counter.load(Ordering::Relaxed)
    }
}

/// `typedef struct refcount_struct { atomic_t refs; } refcount_t;`
#[repr(C)]
#[derive(Debug)]
pub struct refcount_t {
    pub refs: atomic_t,
}

impl refcount_t {
    /// Equivalent of the `REFCOUNT_INIT(n)` initializer
    pub const fn new(n: i32) -> Self {
        Self {
            refs: atomic_t::new(n),
        }
    }

    pub fn read(&self) -> i32 {
        self.refs.read()
    }
}

/// Linux-compatible list_head structure
///
/// This matches the Linux kernel's `struct list_head` exactly:
/// ```c
/// struct list_head {
///     struct list_head *next, *prev;
/// };
/// ```
#[repr(C)]
#[derive(Debug)]
pub struct list_head {
    pub next: *mut list_head,
    pub prev: *mut list_head,
}

impl list_head {
    pub const fn new() -> Self {
        Self {
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        }
    }

    /// Test whether a list is empty
    pub fn is_empty(&self) -> bool {
        ptr::eq(self.next, self)
    }
}

impl Default for list_head {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize a list head to point to itself
///
/// Linux equivalent: `INIT_LIST_HEAD(ptr)`
///
/// # Safety
///
/// Caller must ensure `list` is a valid, non-null pointer to list_head.
pub unsafe fn init_list_head(list: *mut list_head) {
    ptr::addr_of_mut!((*list).next).write_volatile(list);
    ptr::addr_of_mut!((*list).prev).write(list);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refcount_init() {
        let r = refcount_t::new(3);
        assert_eq!(r.read(), 3);
    }

    #[test]
    fn test_init_list_head() {
        let mut head = list_head::new();
        assert!(!head.is_empty());

        let raw: *mut list_head = &mut head;
        unsafe { init_list_head(raw) };

        assert!(head.is_empty());
        assert_eq!(head.prev, raw);
    }
}
