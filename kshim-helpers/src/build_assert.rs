//! Platform layout checks
//!
//! The host passes object sizes as `size_t` while the consumer side indexes
//! with `usize`. If those ever differ in size or alignment the crate must not
//! build.

use kshim_ffi::size_t;

#[doc(hidden)]
pub mod __private {
    pub use static_assertions::{assert_eq_align, assert_eq_size};
}

/// Fail the build unless two types have identical size and alignment.
///
/// ```
/// kshim_helpers::assert_same_layout!(u64, i64);
/// kshim_helpers::assert_same_layout!(usize, *const u8);
/// ```
///
/// A host whose `size_t` is narrower than the pointer width is rejected:
///
/// ```compile_fail
/// type narrow_size_t = u32;
/// type wide_uintptr_t = u64;
/// kshim_helpers::assert_same_layout!(narrow_size_t, wide_uintptr_t);
/// ```
#[macro_export]
macro_rules! assert_same_layout {
    ($a:ty, $b:ty $(,)?) => {
        $crate::build_assert::__private::assert_eq_size!($a, $b);
        $crate::build_assert::__private::assert_eq_align!($a, $b);
    };
}

assert_same_layout!(size_t, usize);
assert_same_layout!(size_t, *const u8);
