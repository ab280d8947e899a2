// SPDX-License-Identifier: GPL-2.0
//
// Map the host configuration onto Kconfig-style --cfg flags so wrapper
// presence can be gated with #[cfg(CONFIG_...)] exactly as the host headers
// gate the primitives.
//
// - CONFIG_64BIT: target pointer width is 64, unless KSHIM_CONFIG_64BIT=n
// - CONFIG_NUMA, CONFIG_KUNIT, CONFIG_DEBUG_SPINLOCK: cargo features

use std::env;

const CONFIGS: &[&str] = &[
    "CONFIG_64BIT",
    "CONFIG_NUMA",
    "CONFIG_KUNIT",
    "CONFIG_DEBUG_SPINLOCK",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KSHIM_CONFIG_64BIT");

    for cfg in CONFIGS {
        println!("cargo:rustc-check-cfg=cfg({cfg})");
    }

    let pointer_width = env::var("CARGO_CFG_TARGET_POINTER_WIDTH").unwrap_or_default();
    let forced_off = env::var("KSHIM_CONFIG_64BIT")
        .map(|v| v.eq_ignore_ascii_case("n"))
        .unwrap_or(false);
    if pointer_width == "64" && !forced_off {
        enable("CONFIG_64BIT");
    }

    if env::var_os("CARGO_FEATURE_NUMA").is_some() {
        enable("CONFIG_NUMA");
    }
    if env::var_os("CARGO_FEATURE_KUNIT").is_some() {
        enable("CONFIG_KUNIT");
    }
    if env::var_os("CARGO_FEATURE_DEBUG_SPINLOCK").is_some() {
        enable("CONFIG_DEBUG_SPINLOCK");
    }
}

fn enable(cfg: &str) {
    println!("cargo:rustc-cfg={cfg}");
}
