//! Runs the built `remod` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const INPUT: &str = "var foo = 10;\n[1, 2, 3].map(function(x) { return x*x });";
const OUTPUT: &str = "const foo = 10;\n[1, 2, 3].map(x => x*x);";

fn remod(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_remod"))
        .args(args)
        .current_dir(dir)
        .env_remove("REMOD_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut pipe = child.stdin.take().unwrap();
        pipe.write_all(stdin.unwrap_or("").as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

fn text(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap()
}

#[test]
fn test_input_file_to_output_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test-data.js"), INPUT).unwrap();

    let output = remod(
        dir.path(),
        &["-t", "let,arrow", "test-data.js", "-o", "output.js"],
        None,
    );
    assert!(output.status.success());
    assert_eq!(text(&output.stdout), "");
    assert_eq!(text(&output.stderr), "");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("output.js")).unwrap(),
        OUTPUT
    );
}

#[test]
fn test_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = remod(dir.path(), &["-t", "let,arrow"], Some(INPUT));
    assert!(output.status.success());
    assert_eq!(text(&output.stdout), OUTPUT);
    assert_eq!(text(&output.stderr), "");
}

#[test]
fn test_unknown_transform_exits_with_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test-data.js"), INPUT).unwrap();

    let output = remod(dir.path(), &["--transform", "blah", "test-data.js"], None);
    assert!(!output.status.success());
    assert_eq!(text(&output.stderr), "Unknown transform \"blah\".\n");
    assert_eq!(text(&output.stdout), "");
    assert!(!dir.path().join("output.js").exists());
}

#[test]
fn test_warnings_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let source = "if (true) { var x = 10; }\n x = 12;\n";
    std::fs::write(dir.path().join("test-data-warnings.js"), source).unwrap();

    let output = remod(
        dir.path(),
        &["--transform", "let", "test-data-warnings.js"],
        None,
    );
    assert!(output.status.success());
    assert_eq!(
        text(&output.stderr),
        "test-data-warnings.js:\n1:  warning  Unable to transform var  (let)\n"
    );
    assert_eq!(text(&output.stdout), source);
}

#[test]
fn test_replace_mode() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
        dir.path().join("src/shape.js"),
        "function Shape() {}\nShape.prototype.area = function() { return 0; };\n",
    )
    .unwrap();

    let output = remod(dir.path(), &["-t", "class", "--replace", "src/*.js"], None);
    assert!(output.status.success(), "{}", text(&output.stderr));
    assert_eq!(text(&output.stdout), "");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("src/shape.js")).unwrap(),
        "class Shape {\n  area() { return 0; }\n}\n"
    );
}
