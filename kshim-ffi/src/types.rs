//! Scalar typedefs used on the boundary
//!
//! Widths follow the kernel's own typedefs. Any drift here is a boundary
//! contract violation, so the aliases are pinned with compile-time checks.

pub use libc::{c_char, c_int, c_long, c_uint, c_ulong, c_ushort, c_void, size_t};

/// File offset (`loff_t`, always `long long`)
pub type loff_t = i64;

/// Sector number (`sector_t`)
pub type sector_t = u64;

/// `resource_size_t` (`phys_addr_t`): 64 bits on 64-bit hosts
#[cfg(target_pointer_width = "64")]
pub type resource_size_t = u64;
#[cfg(not(target_pointer_width = "64"))]
pub type resource_size_t = u32;

/// Lockdep wait type passed to `__raw_spin_lock_init`
pub type lockdep_wait_type = c_int;

pub const LD_WAIT_INV: lockdep_wait_type = 0;
pub const LD_WAIT_FREE: lockdep_wait_type = 1;
pub const LD_WAIT_SPIN: lockdep_wait_type = 2;
/// `LD_WAIT_CONFIG` aliases `LD_WAIT_SPIN` unless PREEMPT_RT is set.
pub const LD_WAIT_CONFIG: lockdep_wait_type = LD_WAIT_SPIN;

static_assertions::assert_eq_size!(loff_t, libc::c_longlong);
static_assertions::assert_eq_size!(c_long, isize);
static_assertions::assert_eq_size!(c_ulong, usize);
