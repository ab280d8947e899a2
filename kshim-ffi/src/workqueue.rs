//! `struct work_struct` as the workqueue subsystem lays it out

use crate::handles::lockdep_map;
use crate::sync::{atomic_long_t, list_head};

/// `typedef void (*work_func_t)(struct work_struct *work);`
pub type work_func_t = Option<unsafe extern "C" fn(work: *mut work_struct)>;

/// Matches `struct work_struct`.
///
/// `lockdep_map` is the trailing member and is only populated on lockdep
/// kernels; here it is a zero-sized marker whose address is all the helper
/// ever needs.
#[repr(C)]
pub struct work_struct {
    pub data: atomic_long_t,
    pub entry: list_head,
    pub func: work_func_t,
    pub lockdep_map: lockdep_map,
}

const BITS_PER_LONG: u32 = isize::BITS;

// Off-queue data layout without CONFIG_DEBUG_OBJECTS_WORK: four flag bits, one
// CANCELING bit, then the pool id.
const WORK_STRUCT_COLOR_SHIFT: u32 = 4;
const WORK_OFFQ_FLAG_BITS: u32 = 1;
const WORK_OFFQ_POOL_SHIFT: u32 = WORK_STRUCT_COLOR_SHIFT + WORK_OFFQ_FLAG_BITS;
const WORK_OFFQ_LEFT: u32 = BITS_PER_LONG - WORK_OFFQ_POOL_SHIFT;
const WORK_OFFQ_POOL_BITS: u32 = if WORK_OFFQ_LEFT <= 31 { WORK_OFFQ_LEFT } else { 31 };
const WORK_OFFQ_POOL_NONE: isize = (1 << WORK_OFFQ_POOL_BITS) - 1;

/// `WORK_STRUCT_NO_POOL`: not pending, not on any pool
pub const WORK_STRUCT_NO_POOL: isize = WORK_OFFQ_POOL_NONE << WORK_OFFQ_POOL_SHIFT;

/// Value of `WORK_DATA_INIT()`
pub const WORK_DATA_INIT: isize = WORK_STRUCT_NO_POOL;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_data_init_has_no_pending_bit() {
        assert_eq!(WORK_DATA_INIT & 1, 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_no_pool_value_64bit() {
        assert_eq!(WORK_STRUCT_NO_POOL, 0xF_FFFF_FFE0);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_no_pool_value_32bit() {
        assert_eq!(WORK_STRUCT_NO_POOL as u32, 0xFFFF_FFE0);
    }
}
