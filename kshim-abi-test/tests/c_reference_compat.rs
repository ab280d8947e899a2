//! C Reference Compatibility Tests
//!
//! Compare boundary structs and helper results against the compiled C reference

use std::collections::HashMap;

use kshim_abi_test::{rust_layouts, StructLayout};
use kshim_ffi::{bio_vec, c_int, c_long, c_void, page, refcount_t, size_t, MAX_ERRNO};
use kshim_helpers::{err, refcount};

extern "C" {
    fn bio_vec_size() -> size_t;
    fn bio_vec_align() -> size_t;
    fn bio_vec_bv_page_offset() -> size_t;
    fn bio_vec_bv_len_offset() -> size_t;
    fn bio_vec_bv_offset_offset() -> size_t;

    fn bvec_iter_size() -> size_t;
    fn bvec_iter_align() -> size_t;
    fn bvec_iter_bi_sector_offset() -> size_t;
    fn bvec_iter_bi_size_offset() -> size_t;
    fn bvec_iter_bi_idx_offset() -> size_t;
    fn bvec_iter_bi_bvec_done_offset() -> size_t;

    fn atomic_t_size() -> size_t;
    fn atomic_t_align() -> size_t;
    fn atomic_long_t_size() -> size_t;
    fn atomic_long_t_align() -> size_t;
    fn refcount_t_size() -> size_t;
    fn refcount_t_align() -> size_t;

    fn list_head_size() -> size_t;
    fn list_head_align() -> size_t;
    fn list_head_next_offset() -> size_t;
    fn list_head_prev_offset() -> size_t;

    fn work_struct_size() -> size_t;
    fn work_struct_align() -> size_t;
    fn work_struct_data_offset() -> size_t;
    fn work_struct_entry_offset() -> size_t;
    fn work_struct_func_offset() -> size_t;
    fn work_struct_lockdep_map_offset() -> size_t;

    fn size_t_size() -> size_t;
    fn size_t_align() -> size_t;
    fn uintptr_t_size() -> size_t;
    fn uintptr_t_align() -> size_t;

    fn ref_make_bvec(page: *mut page, len: u32, off: u32) -> bio_vec;
    fn ref_refcount_init(n: c_int) -> refcount_t;
    fn ref_err_ptr(error: c_long) -> *mut c_void;
    fn ref_ptr_err(ptr: *const c_void) -> c_long;
    fn ref_is_err(ptr: *const c_void) -> c_int;

    static VERIFY_MAX_ERRNO: c_int;
    static VERIFY_WORK_STRUCT_NO_POOL: c_long;
}

fn c_layouts() -> HashMap<&'static str, StructLayout> {
    let layouts = unsafe {
        vec![
            StructLayout {
                name: "bio_vec",
                size: bio_vec_size(),
                align: bio_vec_align(),
                offsets: vec![
                    ("bv_page", bio_vec_bv_page_offset()),
                    ("bv_len", bio_vec_bv_len_offset()),
                    ("bv_offset", bio_vec_bv_offset_offset()),
                ],
            },
            StructLayout {
                name: "bvec_iter",
                size: bvec_iter_size(),
                align: bvec_iter_align(),
                offsets: vec![
                    ("bi_sector", bvec_iter_bi_sector_offset()),
                    ("bi_size", bvec_iter_bi_size_offset()),
                    ("bi_idx", bvec_iter_bi_idx_offset()),
                    ("bi_bvec_done", bvec_iter_bi_bvec_done_offset()),
                ],
            },
            StructLayout {
                name: "atomic_t",
                size: atomic_t_size(),
                align: atomic_t_align(),
                offsets: vec![],
            },
            StructLayout {
                name: "atomic_long_t",
                size: atomic_long_t_size(),
                align: atomic_long_t_align(),
                offsets: vec![],
            },
            StructLayout {
                name: "refcount_t",
                size: refcount_t_size(),
                align: refcount_t_align(),
                offsets: vec![],
            },
            StructLayout {
                name: "list_head",
                size: list_head_size(),
                align: list_head_align(),
                offsets: vec![
                    ("next", list_head_next_offset()),
                    ("prev", list_head_prev_offset()),
                ],
            },
            StructLayout {
                name: "work_struct",
                size: work_struct_size(),
                align: work_struct_align(),
                offsets: vec![
                    ("data", work_struct_data_offset()),
                    ("entry", work_struct_entry_offset()),
                    ("func", work_struct_func_offset()),
                    ("lockdep_map", work_struct_lockdep_map_offset()),
                ],
            },
        ]
    };
    layouts.into_iter().map(|l| (l.name, l)).collect()
}

#[test]
fn test_every_boundary_struct_matches_c() {
    let c = c_layouts();
    let mut problems = Vec::new();

    for ours in rust_layouts() {
        match c.get(ours.name) {
            Some(theirs) => problems.extend(ours.diff(theirs)),
            None => problems.push(format!("{}: no C reference", ours.name)),
        }
    }

    assert!(problems.is_empty(), "layout drift:\n{}", problems.join("\n"));
}

#[test]
fn test_size_t_is_uintptr_t() {
    unsafe {
        assert_eq!(size_t_size(), uintptr_t_size());
        assert_eq!(size_t_align(), uintptr_t_align());
        assert_eq!(size_t_size(), core::mem::size_of::<usize>());
        assert_eq!(size_t_align(), core::mem::align_of::<usize>());
    }
}

#[test]
fn test_bio_vec_by_value_return() {
    let page = 0x4000 as *mut page;
    let bv = unsafe { ref_make_bvec(page, 4096, 128) };
    assert_eq!(bv.bv_page, page);
    assert_eq!(bv.bv_len, 4096);
    assert_eq!(bv.bv_offset, 128);
}

#[test]
fn test_refcount_init_matches_c_initializer() {
    for n in [0, 1, 7, i32::MAX] {
        let c = unsafe { ref_refcount_init(n) };
        let ours = unsafe { refcount::rust_helper_REFCOUNT_INIT(n) };
        assert_eq!(ours.read(), c.read());
    }
}

#[test]
fn test_err_ptr_encoding_matches_c() {
    assert_eq!(unsafe { VERIFY_MAX_ERRNO }, MAX_ERRNO);

    for errno in [-1, -12, -22, -512, -(MAX_ERRNO as c_long)] {
        unsafe {
            let ptr = err::rust_helper_ERR_PTR(errno);
            assert_eq!(ptr, ref_err_ptr(errno));
            assert_eq!(err::rust_helper_IS_ERR(ptr), ref_is_err(ptr) != 0);
            assert_eq!(err::rust_helper_PTR_ERR(ptr), ref_ptr_err(ptr));
        }
    }

    let edge = (MAX_ERRNO as usize + 1).wrapping_neg() as *const c_void;
    assert_eq!(unsafe { err::rust_helper_IS_ERR(edge) }, unsafe { ref_is_err(edge) } != 0);
}

#[test]
fn test_work_data_init_matches_c() {
    assert_eq!(kshim_ffi::WORK_DATA_INIT as c_long, unsafe { VERIFY_WORK_STRUCT_NO_POOL });
}
