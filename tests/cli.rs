use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BANNER: &str =
    "=============================================================================";

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn pyconcat(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pyconcat"));
    cmd.current_dir(dir);
    cmd
}

#[test]
fn zero_arguments_writes_default_output() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.py"), b"x=1");

    pyconcat(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: 1 file(s) written to pyconcat_output.txt"));

    let text = fs::read_to_string(temp.path().join("pyconcat_output.txt")).unwrap();
    let expected = format!(
        "{b}\nDIRECTORY STRUCTURE\n{b}\n\na.py\n\n\
         {b}\nFILE CONTENTS\n{b}\n\
         \n{b}\nФАЙЛ: a.py\n{b}\n\nx=1\n\n\
         {b}\nEND OF FILE CONTENTS\n",
        b = BANNER
    );
    assert_eq!(text, expected);
}

#[test]
fn no_structure_variant() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("pkg/mod.py"), b"pass\n");

    pyconcat(temp.path()).arg("--no-structure").assert().success();

    let text = fs::read_to_string(temp.path().join("pyconcat_output.txt")).unwrap();
    assert!(!text.contains("DIRECTORY STRUCTURE"));
    assert!(text.starts_with(&format!("{}\nFILE CONTENTS\n", BANNER)));
    assert!(text.contains("ФАЙЛ: pkg/mod.py\n"));
}

#[test]
fn empty_tree_reports_success() {
    let temp = tempdir().unwrap();

    pyconcat(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: 0 file(s)"));

    let text = fs::read_to_string(temp.path().join("pyconcat_output.txt")).unwrap();
    assert!(!text.contains("ФАЙЛ:"));
    assert!(text.contains("FILE CONTENTS"));
}

#[test]
fn sorted_runs_are_identical() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("b.py"), b"b");
    write_file(&temp.path().join("a/z.py"), b"z");
    write_file(&temp.path().join("a/y.py"), b"y");

    pyconcat(temp.path()).arg("--sort").assert().success();
    let first = fs::read(temp.path().join("pyconcat_output.txt")).unwrap();
    pyconcat(temp.path()).arg("--sort").assert().success();
    let second = fs::read(temp.path().join("pyconcat_output.txt")).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    let y = text.find("ФАЙЛ: a/y.py").unwrap();
    let z = text.find("ФАЙЛ: a/z.py").unwrap();
    let b = text.find("ФАЙЛ: b.py").unwrap();
    assert!(y < z && z < b);
}

#[test]
fn undecodable_file_does_not_abort() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("bad.py"), &[0x98]);
    write_file(&temp.path().join("good.py"), b"print(1)");

    pyconcat(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unreadable"));

    let text = fs::read_to_string(temp.path().join("pyconcat_output.txt")).unwrap();
    assert!(text.contains("ФАЙЛ: bad.py\n"));
    assert!(text.contains("[ERROR: could not decode file"));
    assert!(text.contains("print(1)"));
}

#[test]
fn explicit_root_and_output() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("project/app.py"), b"app");

    pyconcat(temp.path())
        .arg("project")
        .arg("-o")
        .arg("dump.txt")
        .assert()
        .success();

    let text = fs::read_to_string(temp.path().join("dump.txt")).unwrap();
    assert!(text.contains("ФАЙЛ: app.py\n"));
    assert!(!temp.path().join("pyconcat_output.txt").exists());
}

#[test]
fn config_file_is_applied() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("pyconcat.yml"),
        b"extensions: [pyi]\nignore_patterns: [skip/]\nstructure: false\n",
    );
    write_file(&temp.path().join("stubs.pyi"), b"def f() -> int: ...");
    write_file(&temp.path().join("skip/other.pyi"), b"x");
    write_file(&temp.path().join("main.py"), b"m");

    pyconcat(temp.path()).assert().success();

    let text = fs::read_to_string(temp.path().join("pyconcat_output.txt")).unwrap();
    assert!(text.contains("ФАЙЛ: stubs.pyi\n"));
    assert!(!text.contains("other.pyi"));
    assert!(!text.contains("main.py"));
    assert!(!text.contains("DIRECTORY STRUCTURE"));
}

#[test]
fn missing_root_is_reported() {
    let temp = tempdir().unwrap();

    pyconcat(temp.path())
        .arg("does-not-exist")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: scan root is not a directory"));
}

#[test]
fn bad_config_is_reported_with_pause_requested() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("pyconcat.yml"), b"sort: [not, a, bool]\n");

    // stdin is not a terminal here, so the pause returns at once
    pyconcat(temp.path())
        .arg("--pause")
        .write_stdin("\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: invalid config in"));
}
