//! Symbol manifest for one host configuration.

use std::fmt::Write as _;

use kshim_helpers::exports::available;
use serde::Serialize;
use tracing::debug;

use crate::config::{HostSettings, ManifestError, OutputFormat};

/// What a consumer may bind to on a given host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Exported `rust_helper_*` symbols, in catalogue order.
    pub symbols: Vec<&'static str>,
    /// Kconfig-style `--cfg` names to compile the consumer with.
    pub cfgs: Vec<&'static str>,
}

impl Manifest {
    /// Filter the helper catalogue by the host's capabilities.
    pub fn for_host(host: &HostSettings) -> Self {
        let caps = host.capabilities();
        let symbols: Vec<_> = available(caps).map(|spec| spec.name).collect();

        let mut cfgs: Vec<_> = caps.cfg_names().collect();
        if host.debug_spinlock {
            cfgs.push("CONFIG_DEBUG_SPINLOCK");
        }

        debug!(?caps, symbols = symbols.len(), "computed manifest");
        Self { symbols, cfgs }
    }

    pub fn exports(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, ManifestError> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ManifestError::Serialize(e.to_string())),
            OutputFormat::Cfg => {
                let mut out = String::new();
                for cfg in &self.cfgs {
                    let _ = writeln!(out, "cargo:rustc-cfg={cfg}");
                }
                Ok(out)
            }
        }
    }
}
