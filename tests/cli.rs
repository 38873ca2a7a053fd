use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn cp_ls_and_cat() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("src/inner")).unwrap();
    fs::write(root.join("src/a.txt"), "alpha").unwrap();
    fs::write(root.join("src/inner/b.txt"), "beta").unwrap();

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["cp", "src", "dst"])
        .assert()
        .success();

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["ls", "dst"])
        .assert()
        .success()
        .stdout("a.txt\ninner\n");

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["cat", "dst/inner/b.txt"])
        .assert()
        .success()
        .stdout("beta");
}

#[test]
fn long_listing_shows_kind_and_size() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("five"), "12345").unwrap();
    fs::create_dir(tmp.path().join("dir")).unwrap();

    cargo_bin_cmd!("shellfs")
        .args(["ls", "-l"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(" five\n").and(predicate::str::is_match(r"(?m)^d\d{4} .* dir$").unwrap()))
        .stdout(predicate::str::is_match(r"(?m)^-\d{4} .*\s5 five$").unwrap());
}

#[test]
fn rm_with_glob_and_missing_paths() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("logs")).unwrap();
    fs::write(root.join("logs/a.log"), "").unwrap();
    fs::write(root.join("logs/b.log"), "").unwrap();
    fs::write(root.join("logs/keep.txt"), "").unwrap();

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["rm", "logs/*.log", "never-existed"])
        .assert()
        .success();

    assert!(!root.join("logs/a.log").exists());
    assert!(!root.join("logs/b.log").exists());
    assert!(root.join("logs/keep.txt").exists());
}

#[test]
fn tar_defaults_to_name_tgz_in_current_dir() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("data/x")).unwrap();
    fs::write(root.join("data/x/y"), "y").unwrap();

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["tar", "data"])
        .assert()
        .success();
    assert!(root.join("data.tgz").is_file());

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["untar", "data.tgz", "restored"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(root.join("restored/data/x/y")).unwrap(), "y");
}

#[test]
fn tar_of_current_dir_refuses_to_write_into_it() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("y"), "y").unwrap();

    cargo_bin_cmd!("shellfs")
        .current_dir(&data)
        .args(["tar", "."])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("inside the source directory"));
    assert!(!data.join("data.tgz").exists());
}

#[test]
fn zip_and_unzip_round_trip() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/readme"), "hi").unwrap();

    cargo_bin_cmd!("shellfs").current_dir(root).args(["zip", "pkg"]).assert().success();
    assert!(root.join("pkg.zip").is_file());

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["unzip", "pkg.zip", "out"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(root.join("out/pkg/readme")).unwrap(), "hi");
}

#[test]
fn mkdir_touch_write_and_chmod() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    cargo_bin_cmd!("shellfs").current_dir(root).args(["mkdir", "a/b/c", "d"]).assert().success();
    cargo_bin_cmd!("shellfs").current_dir(root).args(["touch", "a/b/c/t"]).assert().success();
    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["write", "d/w.txt", "written"])
        .assert()
        .success();
    cargo_bin_cmd!("shellfs").current_dir(root).args(["chmod", "-R", "700", "a"]).assert().success();

    assert!(root.join("a/b/c/t").is_file());
    assert_eq!(fs::read_to_string(root.join("d/w.txt")).unwrap(), "written");

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .args(["chmod", "9z", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid octal mode"));
}

#[test]
fn missing_source_fails_with_message() {
    let tmp = tempdir().unwrap();
    cargo_bin_cmd!("shellfs")
        .current_dir(tmp.path())
        .args(["mv", "ghost", "elsewhere"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Move error").and(predicate::str::contains("ghost")));
}

#[test]
fn relpath_and_realpath() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();

    cargo_bin_cmd!("shellfs")
        .args(["relpath"])
        .arg(root.join("a/b"))
        .arg(&root)
        .assert()
        .success()
        .stdout("a/b\n");

    cargo_bin_cmd!("shellfs")
        .current_dir(&root)
        .args(["realpath", "x/../y"])
        .assert()
        .success()
        .stdout(format!("{}\n", root.join("y").display()));
}

#[test]
fn malformed_config_is_reported() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, "gzip_level = [").unwrap();

    cargo_bin_cmd!("shellfs")
        .arg("--config")
        .arg(&cfg)
        .args(["ls", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading settings"));
}

#[test]
fn no_clobber_keeps_existing_file() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("new"), "new").unwrap();
    fs::write(root.join("old"), "old").unwrap();

    cargo_bin_cmd!("shellfs")
        .current_dir(root)
        .env("SHELLFS_CONFIG", root.join("absent.toml"))
        .args(["cp", "-n", "new", "old"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(root.join("old")).unwrap(), "old");
}
