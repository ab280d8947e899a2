//! Host primitive surface
//!
//! Each wrapper reaches the host through exactly one function in this module.
//! Kernel builds bind the `extern "C"` declarations in `bindings`; test builds
//! and the `host-stub` feature swap in an in-process stub with the same
//! signatures.

#[cfg(not(any(test, feature = "host-stub")))]
mod bindings;

#[cfg(not(any(test, feature = "host-stub")))]
pub(crate) use bindings::*;

#[cfg(any(test, feature = "host-stub"))]
pub mod stub;

#[cfg(any(test, feature = "host-stub"))]
pub(crate) use stub::primitives::*;
