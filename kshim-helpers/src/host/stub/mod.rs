//! Controlled in-process host
//!
//! Stands in for the kernel in tests. Each primitive models the documented
//! host behaviour on stub objects (requests, folios, locks, tasks, devices)
//! and appends one [`Call`] to a thread-local log, so a test can check that a
//! wrapper made exactly one call with exactly its own arguments.
//!
//! Stub objects are `#[repr(C)]` structs handed to wrappers through the
//! opaque `kshim_ffi` handle pointers; the stub casts them back.
//!
//! All bookkeeping is thread-local, so tests can run in parallel.

use std::cell::RefCell;

use kshim_ffi::GfpFlags;
use tracing::trace;

pub mod block;
pub mod device;
pub mod io;
pub mod mm;
pub mod sync;
pub mod task;

mod misc;

pub use block::{StubBio, StubRequest, StubTags};
pub use device::{StubDevice, StubPciDev};
pub use io::{take_io_trace, Fence, IoEvent};
pub use mm::{StubFolio, StubPage, PAGE_SIZE};
pub use misc::{clear_current_test, delayed_ms, set_current_test, set_possible_cpus};
pub use sync::{rcu_read_depth, LockClass, StubMutex, StubSpinlock, REFCOUNT_SATURATED};
pub use task::{StubTask, StubWaitEntry};

/// Every host primitive, under the name the wrappers call it by
pub mod primitives {
    pub use super::block::primitives::*;
    pub use super::device::primitives::*;
    pub use super::io::primitives::*;
    pub use super::misc::primitives::*;
    pub use super::mm::primitives::*;
    pub use super::sync::primitives::*;
    pub use super::task::primitives::*;
}

/// One host primitive invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub primitive: &'static str,
    pub args: Vec<u64>,
}

impl Call {
    pub fn new<const N: usize>(primitive: &'static str, args: [u64; N]) -> Self {
        Self {
            primitive,
            args: args.to_vec(),
        }
    }
}

thread_local! {
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn record<const N: usize>(primitive: &'static str, args: [u64; N]) {
    trace!(primitive, args = ?args, "host call");
    CALLS.with(|calls| calls.borrow_mut().push(Call::new(primitive, args)));
}

/// Drain the calls made on this thread so far
pub fn take_calls() -> Vec<Call> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

/// Raw machine word of an argument, as the call log stores it
pub trait Word {
    fn word(&self) -> u64;
}

impl<T> Word for *const T {
    fn word(&self) -> u64 {
        *self as usize as u64
    }
}

impl<T> Word for *mut T {
    fn word(&self) -> u64 {
        *self as usize as u64
    }
}

macro_rules! unsigned_word {
    ($($ty:ty),*) => {
        $(impl Word for $ty {
            fn word(&self) -> u64 {
                *self as u64
            }
        })*
    };
}

macro_rules! signed_word {
    ($($ty:ty),*) => {
        $(impl Word for $ty {
            fn word(&self) -> u64 {
                *self as i64 as u64
            }
        })*
    };
}

unsigned_word!(u8, u16, u32, u64, usize, bool);
signed_word!(i32, i64, isize);

impl Word for GfpFlags {
    fn word(&self) -> u64 {
        u64::from(self.0)
    }
}

impl<F: Copy> Word for Option<F>
where
    F: FnPtrWord,
{
    fn word(&self) -> u64 {
        self.map(|f| f.addr()).unwrap_or(0)
    }
}

/// Function pointers the call log can record
pub trait FnPtrWord {
    fn addr(self) -> u64;
}

impl<A> FnPtrWord for unsafe extern "C" fn(A) {
    fn addr(self) -> u64 {
        self as usize as u64
    }
}

/// Initialize tracing for tests with the `KSHIM_LOG` filter.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("KSHIM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_calls_drains() {
        record("probe", [1, 2]);
        assert_eq!(take_calls(), vec![Call::new("probe", [1, 2])]);
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_words() {
        assert_eq!((-22i64).word(), (-22i64) as u64);
        assert_eq!(true.word(), 1);
        assert_eq!(GfpFlags::GFP_KERNEL.word(), 0x0cc0);
        let none: Option<unsafe extern "C" fn(*mut u8)> = None;
        assert_eq!(none.word(), 0);
    }
}
