//! Opaque host handles
//!
//! Every handle is owned by a host subsystem. On this side they are
//! zero-sized, `!Unpin`, `!Send` placeholders that can only be named behind a
//! raw pointer; nothing here knows their layout.

use core::marker::{PhantomData, PhantomPinned};

macro_rules! opaque_handles {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _data: [u8; 0],
                _marker: PhantomData<(*mut u8, PhantomPinned)>,
            }
        )*
    };
}

opaque_handles! {
    /// `struct request` (block layer)
    request,
    /// `struct bio`
    bio,
    /// `struct blk_mq_tags`
    blk_mq_tags,
    /// `struct folio`
    folio,
    /// `struct page`
    page,
    /// `struct mutex`
    mutex,
    /// `spinlock_t`
    spinlock_t,
    /// `raw_spinlock_t`, the first member of every `spinlock_t`
    raw_spinlock_t,
    /// `struct lock_class_key`
    lock_class_key,
    /// `struct lockdep_map`; zero-sized when lockdep is off
    lockdep_map,
    /// `struct task_struct`
    task_struct,
    /// `struct device`
    device,
    /// `struct pci_dev`
    pci_dev,
    /// `struct wait_queue_entry`
    wait_queue_entry,
    /// `struct kunit`
    kunit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_zero_sized() {
        assert_eq!(core::mem::size_of::<folio>(), 0);
        assert_eq!(core::mem::size_of::<request>(), 0);
        assert_eq!(core::mem::align_of::<pci_dev>(), 1);
    }
}
