//! Memory-mapped I/O accessors
//!
//! Ordered accessors carry the host's I/O barriers; `_relaxed` accessors do
//! not order against normal memory or DMA. Both are inline per-architecture
//! in the host, so the helper is the only linkable form. 64-bit accessors
//! exist only on `CONFIG_64BIT` hosts.

use kshim_ffi::{c_long, c_void, size_t};

use crate::host;

macro_rules! mmio_accessors {
    ($(
        $(#[$cfg:meta])*
        $read:ident => $host_read:ident, $write:ident => $host_write:ident: $ty:ty;
    )*) => {
        $(
            $(#[$cfg])*
            export! {
                /// # Safety
                ///
                /// `addr` must be a mapped MMIO address, aligned for the access width.
                pub unsafe fn $read(addr: *const c_void) -> $ty {
                    host::$host_read(addr)
                }

                /// # Safety
                ///
                /// `addr` must be a mapped MMIO address, aligned for the access width.
                pub unsafe fn $write(value: $ty, addr: *mut c_void) {
                    host::$host_write(value, addr)
                }
            }
        )*
    };
}

mmio_accessors! {
    rust_helper_readb => readb, rust_helper_writeb => writeb: u8;
    rust_helper_readw => readw, rust_helper_writew => writew: u16;
    rust_helper_readl => readl, rust_helper_writel => writel: u32;
    #[cfg(CONFIG_64BIT)]
    rust_helper_readq => readq, rust_helper_writeq => writeq: u64;

    rust_helper_readb_relaxed => readb_relaxed, rust_helper_writeb_relaxed => writeb_relaxed: u8;
    rust_helper_readw_relaxed => readw_relaxed, rust_helper_writew_relaxed => writew_relaxed: u16;
    rust_helper_readl_relaxed => readl_relaxed, rust_helper_writel_relaxed => writel_relaxed: u32;
    #[cfg(CONFIG_64BIT)]
    rust_helper_readq_relaxed => readq_relaxed, rust_helper_writeq_relaxed => writeq_relaxed: u64;
}

export! {
    /// Copy `count` bytes out of I/O memory.
    ///
    /// `count` arrives as a C `long` and is handed on as `size_t`.
    ///
    /// # Safety
    ///
    /// `from` must be mapped MMIO of at least `count` bytes; `to` must be
    /// writable for `count` bytes. `count` must not be negative.
    pub unsafe fn rust_helper_memcpy_fromio(to: *mut c_void, from: *const c_void, count: c_long) {
        host::memcpy_fromio(to, from, count as size_t)
    }
}
