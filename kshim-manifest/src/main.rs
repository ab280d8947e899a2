//! kshim-manifest: helper symbols for a target host
//!
//! Prints the `rust_helper_*` symbols a consumer may bind to and the
//! `--cfg` flags to build it with, for one host configuration.
//!
//! ## Configuration
//! ```yaml
//! host:
//!   config_64bit: true
//!   numa: false
//!   kunit: false
//!   debug_spinlock: false
//!
//! output:
//!   format: json   # or cfg
//!   path: target/kshim-manifest.json
//! ```
//!
//! - KSHIM_CONFIG: config file (default: kshim.yaml)
//! - KSHIM_CONFIG_64BIT, KSHIM_CONFIG_NUMA, KSHIM_CONFIG_KUNIT,
//!   KSHIM_CONFIG_DEBUG_SPINLOCK: Kconfig answers (`y`/`n`)
//! - KSHIM_FORMAT: `json` or `cfg`
//! - KSHIM_OUTPUT: output file (default: stdout)
//! - KSHIM_LOG: log filter (default: info)

use tracing::info;

use kshim_manifest::bootstrap::init_tracing;
use kshim_manifest::{Config, Manifest, ManifestError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load()?;
    let manifest = Manifest::for_host(&config.host);
    let rendered = manifest.render(config.output.format)?;

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, &rendered)
                .map_err(|e| ManifestError::FileWrite(path.clone(), e.to_string()))?;
            info!(
                path = %path,
                format = %config.output.format,
                symbols = manifest.symbols.len(),
                "manifest written"
            );
        }
        None => {
            print!("{rendered}");
            info!(
                format = %config.output.format,
                symbols = manifest.symbols.len(),
                "manifest written to stdout"
            );
        }
    }

    Ok(())
}
