//! FFI vocabulary for the kernel helper boundary
//!
//! This crate provides the C types that cross the `rust_helper_*` boundary:
//! scalar typedefs, opaque host handles, and the handful of host structs whose
//! layout a consumer reads or initialises directly. Nothing here calls into
//! the host.

#![cfg_attr(not(test), no_std)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

pub mod block;
pub mod error;
pub mod handles;
pub mod sync;
pub mod types;
pub mod workqueue;

pub use block::{bio_vec, bvec_iter};
pub use error::{KernelError, KernelResult, MAX_ERRNO};
pub use handles::*;
pub use sync::{atomic_long_t, atomic_t, list_head, refcount_t};
pub use types::*;
pub use workqueue::{work_func_t, work_struct, WORK_DATA_INIT};

/// GFP (Get Free Page) flags matching Linux kernel
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GfpFlags(pub u32);

impl GfpFlags {
    pub const GFP_KERNEL: Self = GfpFlags(0x0cc0);
    pub const GFP_ATOMIC: Self = GfpFlags(0x0020);
    pub const GFP_NOWAIT: Self = GfpFlags(0x0000);
    pub const __GFP_ZERO: Self = GfpFlags(0x8000);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for GfpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        GfpFlags(self.0 | rhs.0)
    }
}

/// `gfp_t` as the allocator entry points take it
pub type gfp_t = GfpFlags;
