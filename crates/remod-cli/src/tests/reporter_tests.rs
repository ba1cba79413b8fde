use super::reporter::Reporter;
use remod::Warning;

#[test]
fn test_warnings_with_file_header() {
    let reporter = Reporter::new(false);
    let warnings = vec![
        Warning::new("let", 12, 1, "Unable to transform var"),
        Warning::new("arrow", 40, 3, "Can not use arguments in arrow function"),
    ];
    assert_eq!(
        reporter.render_warnings(Some("a.js"), &warnings),
        "a.js:\n1:  warning  Unable to transform var  (let)\n3:  warning  Can not use arguments in arrow function  (arrow)\n"
    );
}

#[test]
fn test_warnings_without_file_have_no_header() {
    let reporter = Reporter::new(false);
    let warnings = vec![Warning::new("let", 0, 1, "Unable to transform var")];
    assert_eq!(
        reporter.render_warnings(None, &warnings),
        "1:  warning  Unable to transform var  (let)\n"
    );
}

#[test]
fn test_no_warnings_renders_nothing() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.render_warnings(Some("a.js"), &[]), "");
}

#[test]
fn test_failure_line() {
    let reporter = Reporter::new(false);
    let error = anyhow::anyhow!("unexpected token").context("failed to parse source");
    assert_eq!(
        reporter.render_failure(Some("a.js"), &error),
        "a.js: error: failed to parse source: unexpected token\n"
    );
}
