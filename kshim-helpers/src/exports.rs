//! Exported-symbol contract
//!
//! Every wrapper is declared through [`export!`], which gives it a stable
//! unmangled `extern "C"` symbol and, with the `symbol-table` feature, an
//! entry in a link-time table of what this build actually exports.
//!
//! [`CATALOGUE`] is the full list of symbols this layer can export, with the
//! host capabilities each one needs. A consumer build binds to
//! `CATALOGUE` filtered by the host configuration; the capability tests keep
//! the two in step.

use bitflags::bitflags;

/// Declare an exported helper.
///
/// ```ignore
/// export! {
///     /// Forward to `readb`.
///     pub unsafe fn rust_helper_readb(addr: *const c_void) -> u8 {
///         host::readb(addr)
///     }
/// }
/// ```
macro_rules! export {
    ($(
        $(#[$meta:meta])*
        pub unsafe fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? $body:block
    )*) => {
        $(
            $(#[$meta])*
            #[no_mangle]
            pub unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? $body

            #[cfg(feature = "symbol-table")]
            ::inventory::submit! {
                $crate::exports::Export::new(stringify!($name), $name as *const ())
            }
        )*
    };
}

/// Naming convention shared by every exported wrapper
pub const SYMBOL_PREFIX: &str = "rust_helper_";

bitflags! {
    /// Host configuration a symbol depends on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// `CONFIG_64BIT`: native 64-bit MMIO accessors
        const CONFIG_64BIT = 1 << 0;
        /// `CONFIG_KUNIT`: in-kernel test support
        const CONFIG_KUNIT = 1 << 1;
        /// `!CONFIG_NUMA`: the flat-memory allocator entry points
        const UMA = 1 << 2;
    }
}

impl Capabilities {
    /// Capabilities this build was compiled with.
    pub const fn active() -> Self {
        let mut bits = 0;
        if cfg!(CONFIG_64BIT) {
            bits |= Self::CONFIG_64BIT.bits();
        }
        if cfg!(CONFIG_KUNIT) {
            bits |= Self::CONFIG_KUNIT.bits();
        }
        if !cfg!(CONFIG_NUMA) {
            bits |= Self::UMA.bits();
        }
        Self::from_bits_retain(bits)
    }

    /// Kconfig-style `--cfg` names a consumer should pass when binding
    /// against a host with these capabilities.
    pub fn cfg_names(self) -> impl Iterator<Item = &'static str> {
        let mut names = [None; 3];
        if self.contains(Self::CONFIG_64BIT) {
            names[0] = Some("CONFIG_64BIT");
        }
        if self.contains(Self::CONFIG_KUNIT) {
            names[1] = Some("CONFIG_KUNIT");
        }
        if !self.contains(Self::UMA) {
            names[2] = Some("CONFIG_NUMA");
        }
        names.into_iter().flatten()
    }
}

/// Host subsystem a wrapper belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Block,
    Refcount,
    ErrPtr,
    Lock,
    Rcu,
    Mmio,
    Memory,
    Task,
    Device,
    Workqueue,
    Diagnostics,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Block => "block",
            Category::Refcount => "refcount",
            Category::ErrPtr => "err_ptr",
            Category::Lock => "lock",
            Category::Rcu => "rcu",
            Category::Mmio => "mmio",
            Category::Memory => "memory",
            Category::Task => "task",
            Category::Device => "device",
            Category::Workqueue => "workqueue",
            Category::Diagnostics => "diagnostics",
        }
    }
}

/// One catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSpec {
    pub name: &'static str,
    pub category: Category,
    pub requires: Capabilities,
}

impl SymbolSpec {
    const fn always(name: &'static str, category: Category) -> Self {
        Self {
            name,
            category,
            requires: Capabilities::empty(),
        }
    }

    const fn gated(name: &'static str, category: Category, requires: Capabilities) -> Self {
        Self {
            name,
            category,
            requires,
        }
    }

    /// Whether a host with `caps` exports this symbol
    pub fn available_with(&self, caps: Capabilities) -> bool {
        caps.contains(self.requires)
    }
}

use Capabilities as C;
use Category::*;

/// Every symbol this layer can export.
pub const CATALOGUE: &[SymbolSpec] = &[
    SymbolSpec::always("rust_helper_req_bvec", Block),
    SymbolSpec::always("rust_helper_blk_mq_rq_to_pdu", Block),
    SymbolSpec::always("rust_helper_blk_mq_rq_from_pdu", Block),
    SymbolSpec::always("rust_helper_bio_advance_iter_single", Block),
    SymbolSpec::always("rust_helper_blk_mq_free_request_internal", Block),
    SymbolSpec::always("rust_helper_blk_mq_tag_to_rq", Block),
    SymbolSpec::always("rust_helper_blk_rq_payload_bytes", Block),
    SymbolSpec::always("rust_helper_blk_rq_nr_phys_segments", Block),
    SymbolSpec::always("rust_helper_req_ref_inc_not_zero", Refcount),
    SymbolSpec::always("rust_helper_req_ref_put_and_test", Refcount),
    SymbolSpec::always("rust_helper_REFCOUNT_INIT", Refcount),
    SymbolSpec::always("rust_helper_refcount_inc", Refcount),
    SymbolSpec::always("rust_helper_refcount_dec_and_test", Refcount),
    SymbolSpec::always("rust_helper_ERR_PTR", ErrPtr),
    SymbolSpec::always("rust_helper_IS_ERR", ErrPtr),
    SymbolSpec::always("rust_helper_PTR_ERR", ErrPtr),
    SymbolSpec::always("rust_helper___mutex_init", Lock),
    SymbolSpec::always("rust_helper_mutex_lock", Lock),
    SymbolSpec::always("rust_helper_mutex_unlock", Lock),
    SymbolSpec::always("rust_helper___spin_lock_init", Lock),
    SymbolSpec::always("rust_helper_spin_lock", Lock),
    SymbolSpec::always("rust_helper_spin_unlock", Lock),
    SymbolSpec::always("rust_helper_rcu_read_lock", Rcu),
    SymbolSpec::always("rust_helper_rcu_read_unlock", Rcu),
    SymbolSpec::always("rust_helper_readb", Mmio),
    SymbolSpec::always("rust_helper_readw", Mmio),
    SymbolSpec::always("rust_helper_readl", Mmio),
    SymbolSpec::gated("rust_helper_readq", Mmio, C::CONFIG_64BIT),
    SymbolSpec::always("rust_helper_writeb", Mmio),
    SymbolSpec::always("rust_helper_writew", Mmio),
    SymbolSpec::always("rust_helper_writel", Mmio),
    SymbolSpec::gated("rust_helper_writeq", Mmio, C::CONFIG_64BIT),
    SymbolSpec::always("rust_helper_readb_relaxed", Mmio),
    SymbolSpec::always("rust_helper_readw_relaxed", Mmio),
    SymbolSpec::always("rust_helper_readl_relaxed", Mmio),
    SymbolSpec::gated("rust_helper_readq_relaxed", Mmio, C::CONFIG_64BIT),
    SymbolSpec::always("rust_helper_writeb_relaxed", Mmio),
    SymbolSpec::always("rust_helper_writew_relaxed", Mmio),
    SymbolSpec::always("rust_helper_writel_relaxed", Mmio),
    SymbolSpec::gated("rust_helper_writeq_relaxed", Mmio, C::CONFIG_64BIT),
    SymbolSpec::always("rust_helper_memcpy_fromio", Mmio),
    SymbolSpec::always("rust_helper_folio_get", Memory),
    SymbolSpec::always("rust_helper_folio_put", Memory),
    SymbolSpec::always("rust_helper_folio_page", Memory),
    SymbolSpec::always("rust_helper_folio_pos", Memory),
    SymbolSpec::always("rust_helper_folio_size", Memory),
    SymbolSpec::always("rust_helper_folio_mark_uptodate", Memory),
    SymbolSpec::always("rust_helper_folio_set_error", Memory),
    SymbolSpec::gated("rust_helper_folio_alloc", Memory, C::UMA),
    SymbolSpec::always("rust_helper_flush_dcache_folio", Memory),
    SymbolSpec::always("rust_helper_kmap_local_folio", Memory),
    SymbolSpec::always("rust_helper_kmap", Memory),
    SymbolSpec::always("rust_helper_kunmap", Memory),
    SymbolSpec::always("rust_helper_alloc_pages", Memory),
    SymbolSpec::always("rust_helper_kmap_local_page", Memory),
    SymbolSpec::always("rust_helper_kunmap_local", Memory),
    SymbolSpec::always("rust_helper_get_current", Task),
    SymbolSpec::always("rust_helper_get_task_struct", Task),
    SymbolSpec::always("rust_helper_put_task_struct", Task),
    SymbolSpec::always("rust_helper_signal_pending", Task),
    SymbolSpec::always("rust_helper_init_wait", Task),
    SymbolSpec::always("rust_helper_mdelay", Task),
    SymbolSpec::always("rust_helper_num_possible_cpus", Task),
    SymbolSpec::always("rust_helper_dev_get_drvdata", Device),
    SymbolSpec::always("rust_helper_dev_set_drvdata", Device),
    SymbolSpec::always("rust_helper_dev_name", Device),
    SymbolSpec::always("rust_helper_pci_get_drvdata", Device),
    SymbolSpec::always("rust_helper_pci_set_drvdata", Device),
    SymbolSpec::always("rust_helper_pci_resource_start", Device),
    SymbolSpec::always("rust_helper_init_work_with_key", Workqueue),
    SymbolSpec::always("rust_helper_errname", Diagnostics),
    SymbolSpec::gated("rust_helper_kunit_get_current_test", Diagnostics, C::CONFIG_KUNIT),
    SymbolSpec::always("rust_helper_BUG", Diagnostics),
];

/// Look up a catalogue entry by symbol name
pub fn lookup(name: &str) -> Option<&'static SymbolSpec> {
    CATALOGUE.iter().find(|spec| spec.name == name)
}

/// Catalogue entries a host with `caps` exports
pub fn available(caps: Capabilities) -> impl Iterator<Item = &'static SymbolSpec> {
    CATALOGUE.iter().filter(move |spec| spec.available_with(caps))
}

/// A symbol compiled into this build
#[derive(Debug)]
pub struct Export {
    pub name: &'static str,
    pub addr: *const (),
}

// SAFETY: `addr` is the address of a function item; it is never dereferenced
// as data and functions are immutable.
unsafe impl Sync for Export {}

impl Export {
    pub const fn new(name: &'static str, addr: *const ()) -> Self {
        Self { name, addr }
    }
}

#[cfg(feature = "symbol-table")]
inventory::collect!(Export);

/// Symbols this build exports
#[cfg(feature = "symbol-table")]
pub fn compiled() -> impl Iterator<Item = &'static Export> {
    inventory::iter::<Export>.into_iter()
}
