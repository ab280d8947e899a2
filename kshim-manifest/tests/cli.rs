//! Run the manifest binary against configuration files.

use std::process::{Command, Output};

use tempfile::TempDir;

fn run(dir: &TempDir, yaml: &str, env: &[(&str, &str)]) -> Output {
    let config = dir.path().join("kshim.yaml");
    std::fs::write(&config, yaml).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kshim-manifest"));
    cmd.env("KSHIM_CONFIG", &config).env("KSHIM_LOG", "warn");
    for var in [
        "KSHIM_CONFIG_64BIT",
        "KSHIM_CONFIG_NUMA",
        "KSHIM_CONFIG_KUNIT",
        "KSHIM_CONFIG_DEBUG_SPINLOCK",
        "KSHIM_FORMAT",
        "KSHIM_OUTPUT",
    ] {
        cmd.env_remove(var);
    }
    cmd.envs(env.iter().copied());
    cmd.output().unwrap()
}

#[test]
fn test_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(&dir, "host:\n  config_64bit: true\n  numa: true\n", &[]);
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let symbols: Vec<_> = value["symbols"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s.as_str())
        .collect();
    assert!(symbols.contains(&"rust_helper_readq"));
    assert!(!symbols.contains(&"rust_helper_folio_alloc"));
    assert_eq!(value["cfgs"], serde_json::json!(["CONFIG_64BIT", "CONFIG_NUMA"]));
}

#[test]
fn test_cfg_lines_with_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        &dir,
        "host:\n  config_64bit: true\n  numa: true\n",
        &[("KSHIM_CONFIG_64BIT", "n"), ("KSHIM_FORMAT", "cfg")],
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "cargo:rustc-cfg=CONFIG_NUMA\n");
}

#[test]
fn test_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("manifest.txt");
    let yaml = format!(
        "host:\n  kunit: true\n  debug_spinlock: true\noutput:\n  format: cfg\n  path: {}\n",
        target.display()
    );
    let out = run(&dir, &yaml, &[("KSHIM_CONFIG_64BIT", "y")]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());

    let written = std::fs::read_to_string(&target).unwrap();
    assert_eq!(
        written,
        "cargo:rustc-cfg=CONFIG_64BIT\n\
         cargo:rustc-cfg=CONFIG_KUNIT\n\
         cargo:rustc-cfg=CONFIG_DEBUG_SPINLOCK\n"
    );
}

#[test]
fn test_bad_yaml_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(&dir, "host: [unterminated\n", &[]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Parse("));
}

#[test]
fn test_unknown_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(&dir, "host:\n  kunit: false\n", &[("KSHIM_FORMAT", "xml")]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains(r#"UnknownFormat("xml")"#));
}
