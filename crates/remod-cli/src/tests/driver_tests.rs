use super::args::CliArgs;
use super::driver::{EXIT_FAILURE, EXIT_SUCCESS, Io, collect_targets, run};
use super::reporter::Reporter;
use clap::Parser;
use tempfile::TempDir;

const INPUT: &str = "var foo = 10;\n[1, 2, 3].map(function(x) { return x*x });";
const OUTPUT: &str = "const foo = 10;\n[1, 2, 3].map(x => x*x);";

struct Captured {
    status: i32,
    stdout: String,
    stderr: String,
}

fn invoke(argv: &[&str], stdin: &str) -> Captured {
    let args = CliArgs::try_parse_from(argv).unwrap();
    let mut input = stdin.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut io = Io {
        stdin: &mut input,
        stdout: &mut stdout,
        stderr: &mut stderr,
    };
    let status = run(&args, &Reporter::new(false), &mut io).unwrap();
    Captured {
        status,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[test]
fn test_stdin_to_stdout() {
    let result = invoke(&["remod", "-t", "let,arrow"], INPUT);
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, OUTPUT);
    assert_eq!(result.stderr, "");
}

#[test]
fn test_file_to_out_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.js");
    let output = dir.path().join("out.js");
    std::fs::write(&input, INPUT).unwrap();

    let result = invoke(
        &[
            "remod",
            "-t",
            "let,arrow",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), OUTPUT);
}

#[test]
fn test_unknown_transform() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.js");
    let result = invoke(
        &["remod", "--transform", "blah", "-o", output.to_str().unwrap()],
        INPUT,
    );
    assert_eq!(result.status, EXIT_FAILURE);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "Unknown transform \"blah\".\n");
    assert!(!output.exists());
}

#[test]
fn test_warnings_for_stdin_have_no_header() {
    let source = "if (true) { var x = 10; }\n x = 12;\n";
    let result = invoke(&["remod", "-t", "let"], source);
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, source);
    assert_eq!(result.stderr, "1:  warning  Unable to transform var  (let)\n");
}

#[test]
fn test_parse_failure_writes_nothing() {
    let result = invoke(&["remod", "-t", "let"], "var = ;");
    assert_eq!(result.status, EXIT_FAILURE);
    assert_eq!(result.stdout, "");
    assert!(result.stderr.starts_with("error: failed to parse source"), "{}", result.stderr);
}

#[test]
fn test_replace_rewrites_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("lib");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
    std::fs::write(nested.join("b.js"), "var b = 1;\nb = 2;\n").unwrap();
    std::fs::write(nested.join("notes.txt"), "var c = 1;\n").unwrap();

    let result = invoke(
        &["remod", "-t", "let", "--replace", dir.path().to_str().unwrap()],
        "",
    );
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, "");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.js")).unwrap(),
        "const a = 1;\n"
    );
    assert_eq!(
        std::fs::read_to_string(nested.join("b.js")).unwrap(),
        "let b = 1;\nb = 2;\n"
    );
    assert_eq!(
        std::fs::read_to_string(nested.join("notes.txt")).unwrap(),
        "var c = 1;\n"
    );
}

#[test]
fn test_replace_continues_past_broken_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.js"), "var = ;").unwrap();
    std::fs::write(dir.path().join("good.js"), "var a = 1;\n").unwrap();

    let result = invoke(
        &["remod", "-t", "let", "--replace", dir.path().to_str().unwrap()],
        "",
    );
    assert_eq!(result.status, EXIT_FAILURE);
    assert!(result.stderr.contains("bad.js: error: failed to parse source"), "{}", result.stderr);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("good.js")).unwrap(),
        "const a = 1;\n"
    );
    assert_eq!(std::fs::read_to_string(dir.path().join("bad.js")).unwrap(), "var = ;");
}

#[test]
fn test_glob_targets() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(src.join("deep")).unwrap();
    std::fs::write(src.join("a.js"), "").unwrap();
    std::fs::write(src.join("deep").join("b.js"), "").unwrap();
    std::fs::write(dir.path().join("c.js"), "").unwrap();

    let pattern = format!("{}/src/**/*.js", dir.path().display());
    let files = collect_targets(&pattern).unwrap();
    assert_eq!(files, vec![src.join("a.js"), src.join("deep").join("b.js")]);
}

#[test]
fn test_empty_match_is_an_error() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.js", dir.path().display());
    assert!(collect_targets(&pattern).is_err());
}
