//! Generic and PCI devices

use std::ffi::CString;
use std::sync::atomic::{AtomicPtr, Ordering};

use kshim_ffi::{c_void, device, pci_dev, resource_size_t};

/// `PCI_NUM_RESOURCES`: six BARs, the ROM, four bridge windows
pub const PCI_NUM_RESOURCES: usize = 11;

#[repr(C)]
pub struct StubDevice {
    pub driver_data: AtomicPtr<c_void>,
    pub name: CString,
}

impl StubDevice {
    pub fn new(name: &str) -> Self {
        Self {
            driver_data: AtomicPtr::new(std::ptr::null_mut()),
            name: CString::new(name).unwrap_or_default(),
        }
    }

    pub fn as_ptr(&self) -> *mut device {
        self as *const Self as *mut device
    }

    pub fn driver_data(&self) -> *mut c_void {
        self.driver_data.load(Ordering::SeqCst)
    }
}

#[repr(C)]
pub struct StubPciDev {
    pub dev: StubDevice,
    pub resource_start: [resource_size_t; PCI_NUM_RESOURCES],
}

impl StubPciDev {
    pub fn new(name: &str, bars: &[resource_size_t]) -> Self {
        let mut resource_start = [0; PCI_NUM_RESOURCES];
        for (slot, bar) in resource_start.iter_mut().zip(bars) {
            *slot = *bar;
        }
        Self {
            dev: StubDevice::new(name),
            resource_start,
        }
    }

    pub fn as_ptr(&self) -> *mut pci_dev {
        self as *const Self as *mut pci_dev
    }
}

pub mod primitives {
    use std::sync::atomic::Ordering;

    use kshim_ffi::{c_char, c_int, c_void, device, pci_dev, resource_size_t};

    use super::{StubDevice, StubPciDev};
    use crate::host::stub::{record, Word};

    unsafe fn stub_device<'a>(dev: *const device) -> &'a StubDevice {
        &*dev.cast::<StubDevice>()
    }

    unsafe fn stub_pci<'a>(pdev: *mut pci_dev) -> &'a StubPciDev {
        &*pdev.cast::<StubPciDev>()
    }

    pub unsafe fn dev_get_drvdata(dev: *const device) -> *mut c_void {
        record("dev_get_drvdata", [dev.word()]);
        stub_device(dev).driver_data.load(Ordering::Acquire)
    }

    pub unsafe fn dev_set_drvdata(dev: *mut device, data: *mut c_void) {
        record("dev_set_drvdata", [dev.word(), data.word()]);
        stub_device(dev).driver_data.store(data, Ordering::Release);
    }

    pub unsafe fn dev_name(dev: *const device) -> *const c_char {
        record("dev_name", [dev.word()]);
        stub_device(dev).name.as_ptr()
    }

    pub unsafe fn pci_get_drvdata(pdev: *mut pci_dev) -> *mut c_void {
        record("pci_get_drvdata", [pdev.word()]);
        stub_pci(pdev).dev.driver_data.load(Ordering::Acquire)
    }

    pub unsafe fn pci_set_drvdata(pdev: *mut pci_dev, data: *mut c_void) {
        record("pci_set_drvdata", [pdev.word(), data.word()]);
        stub_pci(pdev).dev.driver_data.store(data, Ordering::Release);
    }

    pub unsafe fn pci_resource_start(pdev: *mut pci_dev, bar: c_int) -> resource_size_t {
        record("pci_resource_start", [pdev.word(), bar.word()]);
        stub_pci(pdev).resource_start[bar as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::primitives::*;
    use super::*;

    #[test]
    fn test_pci_drvdata_is_the_device_drvdata() {
        let pdev = StubPciDev::new("0000:00:1f.0", &[0xfe00_0000]);
        let mut payload = 7u32;
        let data = &mut payload as *mut u32 as *mut c_void;

        unsafe { pci_set_drvdata(pdev.as_ptr(), data) };

        assert_eq!(pdev.dev.driver_data(), data);
        assert_eq!(unsafe { dev_get_drvdata(pdev.dev.as_ptr()) }, data);
    }

    #[test]
    fn test_resource_start() {
        let pdev = StubPciDev::new("0000:01:00.0", &[0x1000, 0x2000]);
        assert_eq!(unsafe { pci_resource_start(pdev.as_ptr(), 1) }, 0x2000);
        assert_eq!(unsafe { pci_resource_start(pdev.as_ptr(), 5) }, 0);
    }
}
