use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DOC: &str = "# Demo\n\n```go\npackage main\n```\n\n```rust\nfn main() {}\n```\n";

fn lingo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lingo").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("demo.md"), DOC).unwrap();
    fs::write(dir.path().join("prose.md"), "no code\n").unwrap();
    dir
}

#[test]
fn bare_invocation_converts_the_working_directory() {
    let dir = setup();
    lingo(dir.path()).assert().success();

    assert_eq!(
        fs::read_to_string(dir.path().join("demo.md.go")).unwrap(),
        "//line demo.md:4\npackage main\n"
    );
    assert!(!dir.path().join("prose.md.go").exists());
}

#[test]
fn lang_flag_selects_the_target() {
    let dir = setup();
    lingo(dir.path()).args(["--lang", "rust"]).assert().success();

    assert_eq!(
        fs::read_to_string(dir.path().join("demo.md.rs")).unwrap(),
        "//line demo.md:8\nfn main() {}\n"
    );
    assert!(!dir.path().join("demo.md.go").exists());
}

#[test]
fn file_argument_without_subcommand_converts_it() {
    let dir = setup();
    fs::write(dir.path().join("other.md"), "```go\npackage other\n```\n").unwrap();
    lingo(dir.path()).arg("other.md").assert().success();

    assert!(dir.path().join("other.md.go").exists());
    assert!(!dir.path().join("demo.md.go").exists());
}

#[test]
fn list_prints_block_locations() {
    let dir = setup();
    lingo(dir.path())
        .args(["list", "demo.md"])
        .assert()
        .success()
        .stdout(predicate::eq("demo.md:4 (1 line)\n"));
}

#[test]
fn check_fails_until_converted() {
    let dir = setup();
    lingo(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("MISSING").and(predicate::str::contains("demo.md.go")));

    lingo(dir.path()).arg("convert").assert().success();

    lingo(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok ").and(predicate::str::contains("demo.md.go")));
}

#[test]
fn config_file_defines_targets() {
    let dir = setup();
    fs::write(
        dir.path().join("lingo.toml"),
        "target = \"sh\"\n\n[targets.sh]\ntag = \"sh\"\nextension = \"sh\"\ncomment = \"# \"\n",
    )
    .unwrap();
    fs::write(dir.path().join("script.md"), "```sh\necho hi\n```\n").unwrap();

    lingo(dir.path()).assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("script.md.sh")).unwrap(),
        "# line script.md:2\necho hi\n"
    );
}

#[test]
fn unknown_language_is_reported() {
    let dir = setup();
    lingo(dir.path())
        .args(["--lang", "cobol"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown target language 'cobol'"));
}

#[test]
fn unparsable_document_fails_the_batch() {
    let dir = setup();
    fs::write(dir.path().join("bad.md"), b"```go\n\xff\n```\n").unwrap();

    lingo(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bad.md"));
    // bad.md sorts first, so nothing after it was converted.
    assert!(!dir.path().join("demo.md.go").exists());
}

#[test]
fn missing_document_is_an_error() {
    let dir = setup();
    lingo(dir.path())
        .args(["convert", "absent.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read 'absent.md'"));
}

#[test]
fn file_arguments_are_relative_to_the_dir_flag() {
    let root = TempDir::new().unwrap();
    let docs = root.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.md"), "```go\npackage a\n```\n").unwrap();

    lingo(root.path())
        .args(["-C", "docs", "convert", "a.md"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(docs.join("a.md.go")).unwrap(),
        "//line a.md:2\npackage a\n"
    );
}

#[test]
fn short_flag_cluster_takes_its_value() {
    let root = TempDir::new().unwrap();
    let docs = root.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.md"), "```go\npackage a\n```\n").unwrap();
    fs::write(docs.join("b.md"), "```go\npackage b\n```\n").unwrap();

    lingo(root.path()).args(["-vC", "docs", "a.md"]).assert().success();
    assert!(docs.join("a.md.go").exists());
    assert!(!docs.join("b.md.go").exists());
}
