//! Exported kernel helpers
//!
//! Many kernel primitives exist only as `static inline` functions or macros
//! in C headers and leave no symbol behind. This crate gives each one a
//! linkable `rust_helper_<primitive>` forward, so code on the other side of
//! the C ABI can call it.
//!
//! # Architecture
//!
//! ```text
//! Consumer (bindings to rust_helper_*)
//!      ↓
//! Helpers (this crate) - one forward per primitive
//!      ↓
//! host module - kernel `extern "C"` bindings, or the stub host in tests
//! ```
//!
//! # Rules every helper follows
//!
//! - Arguments reach the host primitive unchanged and its result comes back
//!   unchanged. No null checks, no retries.
//! - No state is held between calls. `current` and friends are re-fetched
//!   every time.
//! - Host configuration decides which helpers exist: `CONFIG_64BIT`,
//!   `CONFIG_NUMA`, `CONFIG_KUNIT` and `CONFIG_DEBUG_SPINLOCK` arrive as
//!   `--cfg` flags from the build script. [`exports::CATALOGUE`] lists what
//!   each configuration exports.

#![cfg_attr(not(any(test, feature = "host-stub")), no_std)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

#[macro_use]
pub mod exports;

pub mod host;

pub mod blk;
pub mod build_assert;
pub mod device;
pub mod diag;
pub mod err;
pub mod io;
pub mod mm;
pub mod mutex;
pub mod rcu;
pub mod refcount;
pub mod spinlock;
pub mod task;
pub mod workqueue;

pub use exports::{Capabilities, Category, SymbolSpec, CATALOGUE, SYMBOL_PREFIX};
