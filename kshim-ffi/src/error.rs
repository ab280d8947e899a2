//! Error codes matching Linux kernel errno values

use core::ffi::CStr;

use crate::types::c_int;

/// Largest errno an error pointer can carry (`MAX_ERRNO` in `linux/err.h`)
pub const MAX_ERRNO: c_int = 4095;

/// Error codes matching Linux kernel errno values
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KernelError {
    EPERM = 1,
    ENOENT = 2,
    ESRCH = 3,
    EINTR = 4,
    EIO = 5,
    ENXIO = 6,
    E2BIG = 7,
    EBADF = 9,
    EAGAIN = 11,
    ENOMEM = 12,
    EACCES = 13,
    EFAULT = 14,
    EBUSY = 16,
    EEXIST = 17,
    ENODEV = 19,
    EINVAL = 22,
    ENOSPC = 28,
    EPIPE = 32,
    ERANGE = 34,
    ENOSYS = 38,
    EOVERFLOW = 75,
    EOPNOTSUPP = 95,
    ETIMEDOUT = 110,
    ERESTARTSYS = 512,
}

impl KernelError {
    const ALL: [KernelError; 24] = [
        KernelError::EPERM,
        KernelError::ENOENT,
        KernelError::ESRCH,
        KernelError::EINTR,
        KernelError::EIO,
        KernelError::ENXIO,
        KernelError::E2BIG,
        KernelError::EBADF,
        KernelError::EAGAIN,
        KernelError::ENOMEM,
        KernelError::EACCES,
        KernelError::EFAULT,
        KernelError::EBUSY,
        KernelError::EEXIST,
        KernelError::ENODEV,
        KernelError::EINVAL,
        KernelError::ENOSPC,
        KernelError::EPIPE,
        KernelError::ERANGE,
        KernelError::ENOSYS,
        KernelError::EOVERFLOW,
        KernelError::EOPNOTSUPP,
        KernelError::ETIMEDOUT,
        KernelError::ERESTARTSYS,
    ];

    pub fn to_errno(self) -> c_int {
        -(self as c_int)
    }

    /// Look up a negative (or positive) errno. Unknown values yield `None`.
    pub fn from_errno(errno: c_int) -> Option<Self> {
        let code = errno.checked_abs()?;
        Self::ALL.iter().copied().find(|e| *e as c_int == code)
    }

    /// Symbolic name, as `errname()` prints it
    pub fn name(self) -> &'static CStr {
        match self {
            KernelError::EPERM => c"EPERM",
            KernelError::ENOENT => c"ENOENT",
            KernelError::ESRCH => c"ESRCH",
            KernelError::EINTR => c"EINTR",
            KernelError::EIO => c"EIO",
            KernelError::ENXIO => c"ENXIO",
            KernelError::E2BIG => c"E2BIG",
            KernelError::EBADF => c"EBADF",
            KernelError::EAGAIN => c"EAGAIN",
            KernelError::ENOMEM => c"ENOMEM",
            KernelError::EACCES => c"EACCES",
            KernelError::EFAULT => c"EFAULT",
            KernelError::EBUSY => c"EBUSY",
            KernelError::EEXIST => c"EEXIST",
            KernelError::ENODEV => c"ENODEV",
            KernelError::EINVAL => c"EINVAL",
            KernelError::ENOSPC => c"ENOSPC",
            KernelError::EPIPE => c"EPIPE",
            KernelError::ERANGE => c"ERANGE",
            KernelError::ENOSYS => c"ENOSYS",
            KernelError::EOVERFLOW => c"EOVERFLOW",
            KernelError::EOPNOTSUPP => c"EOPNOTSUPP",
            KernelError::ETIMEDOUT => c"ETIMEDOUT",
            KernelError::ERESTARTSYS => c"ERESTARTSYS",
        }
    }
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_errno() {
        assert_eq!(KernelError::ENOMEM.to_errno(), -12);
        assert_eq!(KernelError::EINVAL.to_errno(), -22);
    }

    #[test]
    fn test_from_errno_round_trip() {
        for e in KernelError::ALL {
            assert_eq!(KernelError::from_errno(e.to_errno()), Some(e));
        }
        assert_eq!(KernelError::from_errno(-4000), None);
        assert_eq!(KernelError::from_errno(c_int::MIN), None);
    }

    #[test]
    fn test_name() {
        assert_eq!(KernelError::ENOMEM.name().to_str(), Ok("ENOMEM"));
        assert_eq!(KernelError::ERESTARTSYS.name().to_str(), Ok("ERESTARTSYS"));
    }

    proptest::proptest! {
        #[test]
        fn prop_known_errno_sign_is_ignored(errno in 1..=MAX_ERRNO) {
            let neg = KernelError::from_errno(-errno);
            proptest::prop_assert_eq!(neg, KernelError::from_errno(errno));
            if let Some(e) = neg {
                proptest::prop_assert_eq!(e.to_errno(), -errno);
            }
        }
    }
}
