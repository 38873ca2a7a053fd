use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use walkdir::WalkDir;

use shellfs::fs_op::archive::{tar_create, tar_extract, zip_create_with, zip_extract, ArchiveOptions};
use shellfs::ZipMethod;

fn tree(root: &Path) -> PathBuf {
    let d = root.join("project");
    fs::create_dir_all(d.join("src/bin")).unwrap();
    fs::create_dir_all(d.join("docs")).unwrap();
    fs::write(d.join("Cargo.toml"), "[package]\n").unwrap();
    fs::write(d.join("src/lib.rs"), "pub fn f() {}\n").unwrap();
    fs::write(d.join("src/bin/main.rs"), "fn main() {}\n").unwrap();
    fs::write(d.join("blob"), vec![0xABu8; 1 << 20]).unwrap();
    d
}

fn names(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

#[test]
fn tar_then_untar_reproduces_names_and_bytes() {
    let tmp = tempdir().unwrap();
    let d = tree(tmp.path());
    let archive = tmp.path().join("archives/nested/project.tgz");

    tar_create(&d, Some(&archive)).unwrap();
    let out = tmp.path().join("out");
    tar_extract(&archive, Some(&out)).unwrap();

    assert_eq!(names(&out.join("project")), names(&d));
    assert_eq!(fs::read(out.join("project/blob")).unwrap(), fs::read(d.join("blob")).unwrap());
}

#[test]
fn zip_then_unzip_reproduces_names_for_both_methods() {
    for method in [ZipMethod::Stored, ZipMethod::Deflated] {
        let tmp = tempdir().unwrap();
        let d = tree(tmp.path());
        let archive = tmp.path().join("project.zip");
        let options = ArchiveOptions {
            zip_method: method,
            ..ArchiveOptions::default()
        };

        zip_create_with(&d, Some(&archive), options).unwrap();
        let out = tmp.path().join("out");
        zip_extract(&archive, Some(&out)).unwrap();

        assert_eq!(names(&out.join("project")), names(&d), "{method:?}");
        assert_eq!(fs::read_to_string(out.join("project/src/lib.rs")).unwrap(), "pub fn f() {}\n");
    }
}

#[test]
fn extracting_twice_overwrites_in_place() {
    let tmp = tempdir().unwrap();
    let d = tree(tmp.path());
    let archive = tmp.path().join("p.tgz");
    tar_create(&d, Some(&archive)).unwrap();
    let out = tmp.path().join("out");
    tar_extract(&archive, Some(&out)).unwrap();
    tar_extract(&archive, Some(&out)).unwrap();
    assert_eq!(names(&out.join("project")), names(&d));
}
