//! Build script for layout conformance testing
//!
//! Compiles a C reference of every struct that crosses the helper boundary,
//! plus a few inline-equivalent functions, into a static library the tests
//! link against.

use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    generate_reference_c_code(&out_dir);

    println!("cargo:rerun-if-changed=build.rs");
}

fn generate_reference_c_code(out_dir: &Path) {
    let c_code = r#"
#include <stddef.h>
#include <stdint.h>

/* include/linux/types.h */
typedef unsigned long long u64;
typedef u64 sector_t;
typedef struct { int counter; } atomic_t;
typedef struct { long counter; } atomic_long_t;
struct list_head { struct list_head *next, *prev; };

/* include/linux/refcount_types.h */
typedef struct refcount_struct { atomic_t refs; } refcount_t;

/* include/linux/bvec.h */
struct page;
struct bio_vec {
    struct page *bv_page;
    unsigned int bv_len;
    unsigned int bv_offset;
};
struct bvec_iter {
    sector_t bi_sector;
    unsigned int bi_size;
    unsigned int bi_idx;
    unsigned int bi_bvec_done;
};

/* include/linux/workqueue_types.h, lockdep disabled */
struct lockdep_map {};
struct work_struct;
typedef void (*work_func_t)(struct work_struct *work);
struct work_struct {
    atomic_long_t data;
    struct list_head entry;
    work_func_t func;
    struct lockdep_map lockdep_map;
};

#define LAYOUT(ty) \
    size_t ty##_size(void) { return sizeof(ty); } \
    size_t ty##_align(void) { return _Alignof(ty); }
#define OFFSET(ty, field) \
    size_t ty##_##field##_offset(void) { return offsetof(ty, field); }

typedef struct bio_vec bio_vec;
typedef struct bvec_iter bvec_iter;
typedef struct list_head list_head;
typedef struct work_struct work_struct;

LAYOUT(bio_vec)
OFFSET(bio_vec, bv_page)
OFFSET(bio_vec, bv_len)
OFFSET(bio_vec, bv_offset)

LAYOUT(bvec_iter)
OFFSET(bvec_iter, bi_sector)
OFFSET(bvec_iter, bi_size)
OFFSET(bvec_iter, bi_idx)
OFFSET(bvec_iter, bi_bvec_done)

LAYOUT(atomic_t)
LAYOUT(atomic_long_t)
LAYOUT(refcount_t)

LAYOUT(list_head)
OFFSET(list_head, next)
OFFSET(list_head, prev)

LAYOUT(work_struct)
OFFSET(work_struct, data)
OFFSET(work_struct, entry)
OFFSET(work_struct, func)
OFFSET(work_struct, lockdep_map)

LAYOUT(size_t)
LAYOUT(uintptr_t)

/* By-value returns, as the host's inline helpers produce them */
struct bio_vec ref_make_bvec(struct page *page, unsigned int len, unsigned int off)
{
    struct bio_vec bv = { .bv_page = page, .bv_len = len, .bv_offset = off };
    return bv;
}

refcount_t ref_refcount_init(int n)
{
    refcount_t r = { .refs = { n } };
    return r;
}

/* include/linux/err.h */
#define MAX_ERRNO 4095
int VERIFY_MAX_ERRNO = MAX_ERRNO;

void *ref_err_ptr(long error) { return (void *)error; }
long ref_ptr_err(const void *ptr) { return (long)ptr; }
int ref_is_err(const void *ptr) { return (unsigned long)ptr >= (unsigned long)-MAX_ERRNO; }

/* include/linux/workqueue.h, CONFIG_DEBUG_OBJECTS_WORK off */
#define BITS_PER_LONG (sizeof(long) * 8)
#define WORK_STRUCT_COLOR_SHIFT 4
#define WORK_OFFQ_FLAG_BITS 1
#define WORK_OFFQ_POOL_SHIFT (WORK_STRUCT_COLOR_SHIFT + WORK_OFFQ_FLAG_BITS)
#define WORK_OFFQ_LEFT (BITS_PER_LONG - WORK_OFFQ_POOL_SHIFT)
#define WORK_OFFQ_POOL_BITS (WORK_OFFQ_LEFT <= 31 ? WORK_OFFQ_LEFT : 31)
long VERIFY_WORK_STRUCT_NO_POOL = (long)(((1UL << WORK_OFFQ_POOL_BITS) - 1) << WORK_OFFQ_POOL_SHIFT);

/* include/linux/gfp_types.h */
unsigned int VERIFY_GFP_KERNEL = 0x0cc0u;
unsigned int VERIFY_GFP_ATOMIC = 0x0020u;
unsigned int VERIFY___GFP_ZERO = 0x8000u;

/* include/linux/lockdep_types.h */
int VERIFY_LD_WAIT_SPIN = 2;

/* include/uapi/asm-generic/errno-base.h, include/linux/errno.h */
int VERIFY_EPERM = 1;
int VERIFY_ENOENT = 2;
int VERIFY_EIO = 5;
int VERIFY_EAGAIN = 11;
int VERIFY_ENOMEM = 12;
int VERIFY_EBUSY = 16;
int VERIFY_EINVAL = 22;
int VERIFY_ENOSPC = 28;
int VERIFY_ERESTARTSYS = 512;
"#;

    let c_file = out_dir.join("kernel_reference.c");
    std::fs::write(&c_file, c_code).expect("Failed to write C reference code");

    cc::Build::new()
        .file(&c_file)
        .warnings(false)
        .static_flag(true)
        .compile("kernel_reference");
}
