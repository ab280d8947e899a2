//! Scenario support for the kernel helpers
//!
//! The helpers are exercised from Gherkin scenarios against the stub host.
//! This crate holds what the step definitions share: fixtures that own stub
//! host objects, and parsing of the names scenarios use.

use std::fmt;
use std::path::PathBuf;

use kshim_ffi::KernelError;
use kshim_helpers::host::stub::{StubMutex, StubRequest, StubSpinlock};

/// Directory holding the `.feature` files
pub fn features_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("features")
}

/// Parse an errno name as scenarios write it (`ENOMEM`, `-ENOMEM`)
pub fn errno_by_name(name: &str) -> Option<KernelError> {
    let name = name.trim().trim_start_matches('-');
    (1..=kshim_ffi::MAX_ERRNO)
        .filter_map(|n| KernelError::from_errno(-n))
        .find(|e| e.name().to_bytes() == name.as_bytes())
}

/// Stub host objects a scenario is working with
#[derive(Default)]
pub struct Fixtures {
    pub request: Option<Box<StubRequest>>,
    pub mutex: Option<Box<StubMutex>>,
    pub spinlock: Option<Box<StubSpinlock>>,
}

impl Fixtures {
    pub fn request(&mut self, refs: i32) -> &StubRequest {
        self.request.insert(StubRequest::new(refs))
    }

    pub fn mutex(&mut self) -> &StubMutex {
        self.mutex.get_or_insert_with(|| Box::new(StubMutex::new()))
    }

    pub fn spinlock(&mut self) -> &StubSpinlock {
        self.spinlock.get_or_insert_with(|| Box::new(StubSpinlock::new()))
    }
}

impl fmt::Debug for Fixtures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixtures")
            .field("request_refs", &self.request.as_ref().map(|r| r.refs()))
            .field("mutex_locked", &self.mutex.as_ref().map(|m| m.is_locked()))
            .field("spinlock_locked", &self.spinlock.as_ref().map(|s| s.is_locked()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_by_name() {
        assert_eq!(errno_by_name("ENOMEM"), Some(KernelError::ENOMEM));
        assert_eq!(errno_by_name("-EINVAL"), Some(KernelError::EINVAL));
        assert_eq!(errno_by_name("ERESTARTSYS"), Some(KernelError::ERESTARTSYS));
        assert_eq!(errno_by_name("ENOTREAL"), None);
    }

    #[test]
    fn test_features_dir_exists() {
        assert!(features_dir().join("refcount.feature").is_file());
    }

    #[test]
    fn test_fixtures_replace_request() {
        let mut fx = Fixtures::default();
        fx.request(1);
        assert_eq!(fx.request(0).refs(), 0);
    }
}
