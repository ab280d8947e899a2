//! Capability manifest for the kernel helpers
//!
//! A consumer build asks this crate which `rust_helper_*` symbols the target
//! host exports and which Kconfig-style `--cfg` flags to compile with. The
//! answer comes from the helper catalogue filtered by a host configuration
//! read from YAML and the environment.

pub mod bootstrap;
pub mod config;
pub mod manifest;

pub use config::{Config, HostSettings, ManifestError, OutputFormat, OutputSettings};
pub use manifest::Manifest;
