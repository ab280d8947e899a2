//! Host configuration for manifest generation.
//!
//! Supports YAML file and environment variable overrides.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use kshim_helpers::Capabilities;
use serde::Deserialize;
use tracing::{debug, warn};

/// Manifest tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Kconfig options of the target host.
    pub host: HostSettings,
    /// Where and how to write the manifest.
    pub output: OutputSettings,
}

/// Kconfig options that decide which helpers the host exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// `CONFIG_64BIT`
    pub config_64bit: bool,
    /// `CONFIG_NUMA`
    pub numa: bool,
    /// `CONFIG_KUNIT`
    pub kunit: bool,
    /// `CONFIG_DEBUG_SPINLOCK`
    pub debug_spinlock: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            config_64bit: cfg!(target_pointer_width = "64"),
            numa: false,
            kunit: false,
            debug_spinlock: false,
        }
    }
}

impl HostSettings {
    /// Capability set a host with these options provides.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::CONFIG_64BIT, self.config_64bit);
        caps.set(Capabilities::CONFIG_KUNIT, self.kunit);
        caps.set(Capabilities::UMA, !self.numa);
        caps
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Rendering of the manifest.
    pub format: OutputFormat,
    /// File to write; stdout when unset.
    pub path: Option<String>,
}

/// Manifest rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `{"symbols": [...], "cfgs": [...]}`
    #[default]
    Json,
    /// `cargo:rustc-cfg=` lines for a build script to forward
    Cfg,
}

impl FromStr for OutputFormat {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "cfg" => Ok(Self::Cfg),
            _ => Err(ManifestError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Cfg => f.write_str("cfg"),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Defaults
    pub fn load() -> Result<Self, ManifestError> {
        let config_path =
            std::env::var("KSHIM_CONFIG").unwrap_or_else(|_| "kshim.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            debug!(path = %config_path, "loading host configuration");
            Self::from_file(&config_path)?
        } else {
            debug!(path = %config_path, "no configuration file, using defaults");
            Self::default()
        };

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::FileRead(path.to_string(), e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ManifestError> {
        serde_yaml::from_str(content).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ManifestError> {
        let host = &mut self.host;
        for (var, option) in [
            ("KSHIM_CONFIG_64BIT", &mut host.config_64bit),
            ("KSHIM_CONFIG_NUMA", &mut host.numa),
            ("KSHIM_CONFIG_KUNIT", &mut host.kunit),
            ("KSHIM_CONFIG_DEBUG_SPINLOCK", &mut host.debug_spinlock),
        ] {
            if let Ok(value) = std::env::var(var) {
                match parse_tristate(&value) {
                    Some(enabled) => *option = enabled,
                    None => warn!(var, value = %value, "ignoring unrecognised Kconfig value"),
                }
            }
        }

        if let Ok(format) = std::env::var("KSHIM_FORMAT") {
            self.output.format = format.parse()?;
        }

        if let Ok(path) = std::env::var("KSHIM_OUTPUT") {
            self.output.path = Some(path);
        }

        Ok(())
    }
}

/// Kconfig answers: `y` and `m` enable, `n` disables.
fn parse_tristate(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "m" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Manifest tool errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Unknown output format '{0}' (expected json or cfg)")]
    UnknownFormat(String),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(String),

    #[error("Failed to write manifest to '{0}': {1}")]
    FileWrite(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const OVERRIDES: &[&str] = &[
        "KSHIM_CONFIG",
        "KSHIM_CONFIG_64BIT",
        "KSHIM_CONFIG_NUMA",
        "KSHIM_CONFIG_KUNIT",
        "KSHIM_CONFIG_DEBUG_SPINLOCK",
        "KSHIM_FORMAT",
        "KSHIM_OUTPUT",
    ];

    fn clear_env() {
        for var in OVERRIDES {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host.config_64bit, cfg!(target_pointer_width = "64"));
        assert!(!config.host.numa);
        assert!(!config.host.kunit);
        assert!(!config.host.debug_spinlock);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.path.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
host:
  config_64bit: false
  numa: true
  kunit: true

output:
  format: cfg
  path: /tmp/manifest.txt
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert!(!config.host.config_64bit);
        assert!(config.host.numa);
        assert!(config.host.kunit);
        assert!(!config.host.debug_spinlock);
        assert_eq!(config.output.format, OutputFormat::Cfg);
        assert_eq!(config.output.path.as_deref(), Some("/tmp/manifest.txt"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("host:\n  kunit: true\n").unwrap();
        assert!(config.host.kunit);
        assert_eq!(config.host.config_64bit, cfg!(target_pointer_width = "64"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_in_yaml_is_parse_error() {
        let err = Config::from_yaml("output:\n  format: toml\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_file("/nonexistent/kshim.yaml").unwrap_err();
        assert!(matches!(err, ManifestError::FileRead(path, _) if path == "/nonexistent/kshim.yaml"));
    }

    #[test]
    fn test_capabilities_from_host() {
        let host = HostSettings {
            config_64bit: true,
            numa: false,
            kunit: false,
            debug_spinlock: true,
        };
        assert_eq!(host.capabilities(), Capabilities::CONFIG_64BIT | Capabilities::UMA);

        let host = HostSettings {
            config_64bit: false,
            numa: true,
            kunit: true,
            debug_spinlock: false,
        };
        assert_eq!(host.capabilities(), Capabilities::CONFIG_KUNIT);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" CFG ".parse::<OutputFormat>().unwrap(), OutputFormat::Cfg);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(ManifestError::UnknownFormat(f)) if f == "yaml"
        ));
    }

    #[test]
    fn test_parse_tristate() {
        assert_eq!(parse_tristate("y"), Some(true));
        assert_eq!(parse_tristate("m"), Some(true));
        assert_eq!(parse_tristate("N"), Some(false));
        assert_eq!(parse_tristate("0"), Some(false));
        assert_eq!(parse_tristate("maybe"), None);
    }

    #[test]
    #[serial]
    fn test_env_overrides_config_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kshim.yaml");
        std::fs::write(&path, "host:\n  config_64bit: true\n  numa: false\n").unwrap();

        std::env::set_var("KSHIM_CONFIG", &path);
        std::env::set_var("KSHIM_CONFIG_64BIT", "n");
        std::env::set_var("KSHIM_CONFIG_NUMA", "y");
        std::env::set_var("KSHIM_FORMAT", "cfg");

        let config = Config::load().unwrap();
        clear_env();

        assert!(!config.host.config_64bit);
        assert!(config.host.numa);
        assert_eq!(config.output.format, OutputFormat::Cfg);
    }

    #[test]
    #[serial]
    fn test_unrecognised_kconfig_value_is_ignored() {
        clear_env();
        std::env::set_var("KSHIM_CONFIG", "/nonexistent/kshim.yaml");
        std::env::set_var("KSHIM_CONFIG_KUNIT", "perhaps");

        let config = Config::load().unwrap();
        clear_env();

        assert!(!config.host.kunit);
    }

    #[test]
    #[serial]
    fn test_unknown_format_env_fails_load() {
        clear_env();
        std::env::set_var("KSHIM_CONFIG", "/nonexistent/kshim.yaml");
        std::env::set_var("KSHIM_FORMAT", "xml");

        let result = Config::load();
        clear_env();

        assert!(matches!(result, Err(ManifestError::UnknownFormat(_))));
    }
}
