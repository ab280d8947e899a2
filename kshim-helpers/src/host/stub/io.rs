//! MMIO accessors over ordinary memory
//!
//! Ordered accessors follow the generic `asm-generic/io.h` shape: a fence
//! before the raw access and one after it. Relaxed accessors do the raw
//! access only. Every fence and access lands in a thread-local trace.

use std::cell::RefCell;
use std::ptr;
use std::sync::atomic::{fence, Ordering};

use super::record;
use super::Word;

/// Fence points in an ordered accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    /// `__io_br()`: before a read
    BeforeRead,
    /// `__io_ar()`: after a read
    AfterRead,
    /// `__io_bw()`: before a write
    BeforeWrite,
    /// `__io_aw()`: after a write
    AfterWrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoEvent {
    Fence(Fence),
    Read { width: u8, addr: usize },
    Write { width: u8, addr: usize, value: u64 },
    CopyFrom { from: usize, len: usize },
}

thread_local! {
    static IO_TRACE: RefCell<Vec<IoEvent>> = const { RefCell::new(Vec::new()) };
}

fn push(event: IoEvent) {
    IO_TRACE.with(|t| t.borrow_mut().push(event));
}

/// Drain the MMIO events seen on this thread
pub fn take_io_trace() -> Vec<IoEvent> {
    IO_TRACE.with(|t| std::mem::take(&mut *t.borrow_mut()))
}

fn io_fence(kind: Fence) {
    fence(Ordering::SeqCst);
    push(IoEvent::Fence(kind));
}

unsafe fn raw_read<T: Copy + Into<u64>>(addr: *const T) -> T {
    push(IoEvent::Read {
        width: std::mem::size_of::<T>() as u8,
        addr: addr as usize,
    });
    ptr::read_volatile(addr)
}

unsafe fn raw_write<T: Copy + Into<u64>>(value: T, addr: *mut T) {
    push(IoEvent::Write {
        width: std::mem::size_of::<T>() as u8,
        addr: addr as usize,
        value: value.into(),
    });
    ptr::write_volatile(addr, value)
}

unsafe fn ordered_read<T: Copy + Into<u64>>(addr: *const T) -> T {
    io_fence(Fence::BeforeRead);
    let value = raw_read(addr);
    io_fence(Fence::AfterRead);
    value
}

unsafe fn ordered_write<T: Copy + Into<u64>>(value: T, addr: *mut T) {
    io_fence(Fence::BeforeWrite);
    raw_write(value, addr);
    io_fence(Fence::AfterWrite);
}

pub mod primitives {
    use kshim_ffi::{c_void, size_t};

    use super::*;

    macro_rules! stub_accessors {
        ($($read:ident, $write:ident, $read_relaxed:ident, $write_relaxed:ident: $ty:ty;)*) => {
            $(
                pub unsafe fn $read(addr: *const c_void) -> $ty {
                    record(stringify!($read), [addr.word()]);
                    ordered_read(addr.cast::<$ty>())
                }

                pub unsafe fn $write(value: $ty, addr: *mut c_void) {
                    record(stringify!($write), [value.word(), addr.word()]);
                    ordered_write(value, addr.cast::<$ty>())
                }

                pub unsafe fn $read_relaxed(addr: *const c_void) -> $ty {
                    record(stringify!($read_relaxed), [addr.word()]);
                    raw_read(addr.cast::<$ty>())
                }

                pub unsafe fn $write_relaxed(value: $ty, addr: *mut c_void) {
                    record(stringify!($write_relaxed), [value.word(), addr.word()]);
                    raw_write(value, addr.cast::<$ty>())
                }
            )*
        };
    }

    stub_accessors! {
        readb, writeb, readb_relaxed, writeb_relaxed: u8;
        readw, writew, readw_relaxed, writew_relaxed: u16;
        readl, writel, readl_relaxed, writel_relaxed: u32;
    }

    #[cfg(CONFIG_64BIT)]
    stub_accessors! {
        readq, writeq, readq_relaxed, writeq_relaxed: u64;
    }

    pub unsafe fn memcpy_fromio(to: *mut c_void, from: *const c_void, count: size_t) {
        record("memcpy_fromio", [to.word(), from.word(), count.word()]);
        push(IoEvent::CopyFrom {
            from: from as usize,
            len: count,
        });
        let src = from.cast::<u8>();
        let dst = to.cast::<u8>();
        for i in 0..count {
            dst.add(i).write(src.add(i).read_volatile());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::primitives::*;
    use super::*;

    #[test]
    fn test_ordered_read_is_fenced_both_sides() {
        let reg: u32 = 0xdead_beef;
        let addr = &reg as *const u32 as *const kshim_ffi::c_void;
        take_io_trace();

        let v = unsafe { readl(addr) };

        assert_eq!(v, 0xdead_beef);
        assert_eq!(
            take_io_trace(),
            vec![
                IoEvent::Fence(Fence::BeforeRead),
                IoEvent::Read { width: 4, addr: addr as usize },
                IoEvent::Fence(Fence::AfterRead),
            ]
        );
    }

    #[test]
    fn test_relaxed_write_has_no_fence() {
        let mut reg: u16 = 0;
        let addr = &mut reg as *mut u16 as *mut kshim_ffi::c_void;
        take_io_trace();

        unsafe { writew_relaxed(0x1234, addr) };

        assert_eq!(reg, 0x1234);
        assert_eq!(
            take_io_trace(),
            vec![IoEvent::Write { width: 2, addr: addr as usize, value: 0x1234 }]
        );
    }
}
