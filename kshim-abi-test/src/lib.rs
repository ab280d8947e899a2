//! Layout conformance for the helper boundary
//!
//! Every struct the consumer reads or initialises directly must match the
//! host's C layout: size, alignment, and the offset of each field. The
//! compile-time checks below pin the expected 64-bit/32-bit values; the tests
//! compare against a C reference compiled by the build script.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use core::mem::{align_of, size_of};

use kshim_ffi::{atomic_long_t, atomic_t, bio_vec, bvec_iter, list_head, refcount_t, work_struct};
use memoffset::offset_of;

/// Fail the build if a type's size is not the expected value
#[macro_export]
macro_rules! verify_size {
    ($rust_type:ty, $expected_size:expr) => {
        const _: () = {
            const SIZE: usize = ::core::mem::size_of::<$rust_type>();
            const EXPECTED: usize = $expected_size;
            assert!(SIZE == EXPECTED, "Size mismatch");
        };
    };
}

/// Fail the build if a field sits at an unexpected offset
#[macro_export]
macro_rules! verify_offset {
    ($type:ty, $field:ident, $expected_offset:expr) => {
        const _: () = {
            const OFFSET: usize = ::memoffset::offset_of!($type, $field);
            const EXPECTED: usize = $expected_offset;
            assert!(OFFSET == EXPECTED, "Offset mismatch");
        };
    };
}

/// Fail the build if a type's alignment is not the expected value
#[macro_export]
macro_rules! verify_align {
    ($type:ty, $expected_align:expr) => {
        const _: () = {
            const ALIGN: usize = ::core::mem::align_of::<$type>();
            const EXPECTED: usize = $expected_align;
            assert!(ALIGN == EXPECTED, "Alignment mismatch");
        };
    };
}

const PTR: usize = size_of::<usize>();

verify_size!(bio_vec, PTR + 8);
verify_align!(bio_vec, PTR);
verify_offset!(bio_vec, bv_len, PTR);
verify_offset!(bio_vec, bv_offset, PTR + 4);

verify_offset!(bvec_iter, bi_size, 8);
verify_offset!(bvec_iter, bi_idx, 12);
verify_offset!(bvec_iter, bi_bvec_done, 16);

verify_size!(atomic_t, 4);
verify_size!(refcount_t, 4);
verify_align!(refcount_t, 4);
verify_size!(atomic_long_t, PTR);

verify_size!(list_head, 2 * PTR);
verify_offset!(list_head, prev, PTR);

verify_offset!(work_struct, entry, PTR);
verify_offset!(work_struct, func, 3 * PTR);
verify_offset!(work_struct, lockdep_map, 4 * PTR);
verify_size!(work_struct, 4 * PTR);

kshim_helpers::assert_same_layout!(kshim_ffi::size_t, usize);

/// Size, alignment and field offsets of one boundary struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    pub offsets: Vec<(&'static str, usize)>,
}

impl StructLayout {
    fn of<T>(name: &'static str, offsets: Vec<(&'static str, usize)>) -> Self {
        Self {
            name,
            size: size_of::<T>(),
            align: align_of::<T>(),
            offsets,
        }
    }

    /// Differences from `other`, one line per mismatch
    pub fn diff(&self, other: &StructLayout) -> Vec<String> {
        let mut out = Vec::new();
        if self.size != other.size {
            out.push(format!("{}: size {} != {}", self.name, self.size, other.size));
        }
        if self.align != other.align {
            out.push(format!("{}: align {} != {}", self.name, self.align, other.align));
        }
        for (field, offset) in &self.offsets {
            match other.offsets.iter().find(|(f, _)| f == field) {
                Some((_, theirs)) if theirs == offset => {}
                Some((_, theirs)) => {
                    out.push(format!("{}.{field}: offset {offset} != {theirs}", self.name))
                }
                None => out.push(format!("{}.{field}: missing on the other side", self.name)),
            }
        }
        out
    }

    pub fn is_compatible(&self, other: &StructLayout) -> bool {
        self.diff(other).is_empty()
    }
}

/// Rust-side layout of every struct shared with the host
pub fn rust_layouts() -> Vec<StructLayout> {
    vec![
        StructLayout::of::<bio_vec>(
            "bio_vec",
            vec![
                ("bv_page", offset_of!(bio_vec, bv_page)),
                ("bv_len", offset_of!(bio_vec, bv_len)),
                ("bv_offset", offset_of!(bio_vec, bv_offset)),
            ],
        ),
        StructLayout::of::<bvec_iter>(
            "bvec_iter",
            vec![
                ("bi_sector", offset_of!(bvec_iter, bi_sector)),
                ("bi_size", offset_of!(bvec_iter, bi_size)),
                ("bi_idx", offset_of!(bvec_iter, bi_idx)),
                ("bi_bvec_done", offset_of!(bvec_iter, bi_bvec_done)),
            ],
        ),
        StructLayout::of::<atomic_t>("atomic_t", vec![]),
        StructLayout::of::<atomic_long_t>("atomic_long_t", vec![]),
        StructLayout::of::<refcount_t>("refcount_t", vec![]),
        StructLayout::of::<list_head>(
            "list_head",
            vec![
                ("next", offset_of!(list_head, next)),
                ("prev", offset_of!(list_head, prev)),
            ],
        ),
        StructLayout::of::<work_struct>(
            "work_struct",
            vec![
                ("data", offset_of!(work_struct, data)),
                ("entry", offset_of!(work_struct, entry)),
                ("func", offset_of!(work_struct, func)),
                ("lockdep_map", offset_of!(work_struct, lockdep_map)),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_compatible_with_itself() {
        for layout in rust_layouts() {
            assert!(layout.is_compatible(&layout), "{}", layout.name);
        }
    }

    #[test]
    fn test_diff_reports_offset_and_size() {
        let ours = StructLayout {
            name: "pair",
            size: 8,
            align: 4,
            offsets: vec![("a", 0), ("b", 4)],
        };
        let theirs = StructLayout {
            name: "pair",
            size: 16,
            align: 4,
            offsets: vec![("a", 0), ("b", 8)],
        };

        assert_eq!(
            ours.diff(&theirs),
            vec![
                "pair: size 8 != 16".to_string(),
                "pair.b: offset 4 != 8".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_field_is_reported() {
        let ours = StructLayout {
            name: "one",
            size: 4,
            align: 4,
            offsets: vec![("x", 0)],
        };
        let theirs = StructLayout {
            offsets: vec![],
            ..ours.clone()
        };
        assert_eq!(ours.diff(&theirs).len(), 1);
    }
}
