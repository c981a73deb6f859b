use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_lists_init() {
    cargo_bin_cmd!("stencil")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"));
}

#[test]
fn version_is_printed() {
    cargo_bin_cmd!("stencil")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_requires_a_name() {
    cargo_bin_cmd!("stencil")
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<NAME>"));
}

#[test]
fn unknown_template_type_is_rejected() {
    cargo_bin_cmd!("stencil")
        .args(["init", "demo", "--type", "react"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("vue-antd"));
}

#[test]
fn missing_settings_file_fails_before_prompting() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("stencil")
        .current_dir(dir.path())
        .env("STENCIL_CONFIG", dir.path().join("missing.toml"))
        .args(["init", "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("settings file"));
    assert!(!dir.path().join("demo").exists());
}

#[test]
fn project_name_with_separator_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "default_author = \"alice\"\n").unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["init", "a/b"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("path separators"));
}
