#![cfg(unix)]

//! End-to-end runs of the binary with `cat` standing in for the external
//! transformer (an empty blacklist adds no flags, so `cat` is a faithful
//! passthrough engine).

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn backport() -> Command {
    Command::cargo_bin("js-backport").unwrap()
}

#[test]
fn transpiles_single_file_to_new_output_file() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("templateLiteral.js");
    input.write_str("var x = `t`;\n").unwrap();
    let output = tmp.child("out/foo.js");

    backport()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .success();

    output.assert("var x = `t`;\n");
}

#[test]
fn transpiles_directory_into_created_output_directory() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("lib/a.js").write_str("var a;\n").unwrap();
    tmp.child("lib/b.js").write_str("var b;\n").unwrap();
    tmp.child("lib/README.txt").write_str("skip me").unwrap();
    let out = tmp.child("dist");

    backport()
        .arg("-i")
        .arg(tmp.child("lib").path())
        .arg("-o")
        .arg(out.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .success();

    out.child("a.js").assert("var a;\n");
    out.child("b.js").assert("var b;\n");
    out.child("README.txt").assert(predicate::path::missing());
}

#[test]
fn glob_preserves_structure_beneath_pattern_root() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("fixtures/top.js").write_str("1;\n").unwrap();
    tmp.child("fixtures/dir1/class.js").write_str("2;\n").unwrap();
    tmp.child("fixtures/dir1/literals.js")
        .write_str("3;\n")
        .unwrap();
    let out = tmp.child("dist");

    let pattern = format!("{}/fixtures/**", tmp.path().display());
    backport()
        .args(["-i", &pattern])
        .arg("-o")
        .arg(out.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .success();

    out.child("top.js").assert("1;\n");
    out.child("dir1/class.js").assert("2;\n");
    out.child("dir1/literals.js").assert("3;\n");
}

#[test]
fn legacy_dir_flags_still_work() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("lib/a.js").write_str("var a;\n").unwrap();
    let out = tmp.child("dist");

    backport()
        .arg("--in-dir")
        .arg(tmp.child("lib").path())
        .arg("--out-dir")
        .arg(out.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .success();

    out.child("a.js").assert("var a;\n");
}

#[test]
fn directory_onto_existing_file_fails_with_mismatch() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("lib/a.js").write_str("var a;\n").unwrap();
    let taken = tmp.child("taken.js");
    taken.write_str("").unwrap();

    backport()
        .arg("-i")
        .arg(tmp.child("lib").path())
        .arg("-o")
        .arg(taken.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot map input to output"));
}

#[test]
fn no_matches_is_a_silent_success() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let out = tmp.child("dist");

    backport()
        .arg("-i")
        .arg(tmp.child("nothing-here").path())
        .arg("-o")
        .arg(out.path())
        .args(["--target", "0.8.0", "--transformer", "cat"])
        .assert()
        .success();

    out.assert(predicate::path::missing());
}

#[test]
fn missing_input_flag_is_a_usage_error() {
    backport().args(["-o", "dist"]).assert().failure();
}

#[test]
fn missing_output_flag_is_a_usage_error() {
    backport().args(["-i", "a.js"]).assert().failure();
}
