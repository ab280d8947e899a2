//! Driver-data accessors for generic and PCI devices

use kshim_ffi::{c_char, c_int, c_void, device, pci_dev};

use crate::host;

export! {
    /// # Safety
    ///
    /// `dev` must be live.
    pub unsafe fn rust_helper_dev_get_drvdata(dev: *const device) -> *mut c_void {
        host::dev_get_drvdata(dev)
    }

    /// # Safety
    ///
    /// `dev` must be live; the driver owns `data`.
    pub unsafe fn rust_helper_dev_set_drvdata(dev: *mut device, data: *mut c_void) {
        host::dev_set_drvdata(dev, data)
    }

    /// # Safety
    ///
    /// `dev` must be live. The name is only valid while the device is.
    pub unsafe fn rust_helper_dev_name(dev: *const device) -> *const c_char {
        host::dev_name(dev)
    }

    /// # Safety
    ///
    /// `pdev` must be live.
    pub unsafe fn rust_helper_pci_get_drvdata(pdev: *mut pci_dev) -> *mut c_void {
        host::pci_get_drvdata(pdev)
    }

    /// # Safety
    ///
    /// `pdev` must be live; the driver owns `data`.
    pub unsafe fn rust_helper_pci_set_drvdata(pdev: *mut pci_dev, data: *mut c_void) {
        host::pci_set_drvdata(pdev, data)
    }

    /// Bus address where BAR `bar` starts, widened to 64 bits.
    ///
    /// # Safety
    ///
    /// `bar` must be a valid resource index for `pdev`.
    pub unsafe fn rust_helper_pci_resource_start(pdev: *mut pci_dev, bar: c_int) -> u64 {
        u64::from(host::pci_resource_start(pdev, bar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::stub::{take_calls, Call, StubDevice, StubPciDev};
    use std::ffi::CStr;

    #[test]
    fn test_drvdata_round_trip() {
        let dev = StubDevice::new("ttyS0");
        let mut state = [0u8; 16];
        let data = state.as_mut_ptr().cast::<c_void>();
        unsafe {
            rust_helper_dev_set_drvdata(dev.as_ptr(), data);
            assert_eq!(rust_helper_dev_get_drvdata(dev.as_ptr()), data);
        }
    }

    #[test]
    fn test_dev_name() {
        let dev = StubDevice::new("nvme0");
        let name = unsafe { CStr::from_ptr(rust_helper_dev_name(dev.as_ptr())) };
        assert_eq!(name.to_bytes(), b"nvme0");
    }

    #[test]
    fn test_pci_drvdata_forwards_once() {
        let pdev = StubPciDev::new("0000:03:00.0", &[]);
        let data = 0xdead_0000usize as *mut c_void;
        take_calls();

        unsafe {
            rust_helper_pci_set_drvdata(pdev.as_ptr(), data);
            assert_eq!(rust_helper_pci_get_drvdata(pdev.as_ptr()), data);
        }

        let addr = pdev.as_ptr() as u64;
        assert_eq!(
            take_calls(),
            vec![
                Call::new("pci_set_drvdata", [addr, data as u64]),
                Call::new("pci_get_drvdata", [addr]),
            ]
        );
    }

    #[test]
    fn test_resource_start_is_widened() {
        let pdev = StubPciDev::new("0000:00:02.0", &[0, 0, 0xf000_0000]);
        assert_eq!(unsafe { rust_helper_pci_resource_start(pdev.as_ptr(), 2) }, 0xf000_0000u64);
    }
}
