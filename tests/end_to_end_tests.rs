//! End-to-end tests through the public `remod` API.

use remod::{TransformSet, transform_source};

fn run(source: &str, names: &str) -> remod::Outcome {
    let transforms = TransformSet::parse(names).unwrap();
    transform_source(source, &transforms).unwrap()
}

#[test]
fn test_let_and_arrow() {
    let outcome = run(
        "var foo = 10;\n[1, 2, 3].map(function(x) { return x*x });",
        "let,arrow",
    );
    assert_eq!(outcome.code, "const foo = 10;\n[1, 2, 3].map(x => x*x);");
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_unsafe_var_is_reported_and_kept() {
    let source = "if (true) { var x = 10; }\n x = 12;\n";
    let outcome = run(source, "let");
    assert_eq!(outcome.code, source);
    let lines: Vec<_> = outcome.warnings.iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["1:  warning  Unable to transform var  (let)"]);
}

#[test]
fn test_class_from_prototype() {
    let outcome = run(
        "function C(){}; C.prototype.bar = function(){ return 1; };",
        "class",
    );
    assert_eq!(outcome.code, "class C {\n  bar() { return 1; }\n}");
    assert!(!outcome.code.contains("prototype"));
}

#[test]
fn test_class_then_arrow_and_let() {
    let source = "function Queue() {\n  var items = [];\n  this.items = items;\n}\nQueue.prototype.each = function(fn) {\n  this.items.forEach(function(item) { fn(item); });\n};\n";
    let outcome = run(source, "class,let,arrow");
    assert!(outcome.code.starts_with("class Queue {\n"), "{}", outcome.code);
    assert!(outcome.code.contains("const items = [];"), "{}", outcome.code);
    assert!(outcome.code.contains("forEach(item => { fn(item); })"), "{}", outcome.code);
}

#[test]
fn test_parse_failure_produces_no_output() {
    let transforms = TransformSet::parse("let").unwrap();
    let err = transform_source("var = ;", &transforms).unwrap_err();
    assert!(err.to_string().contains("failed to parse source"));
}

#[test]
fn test_outcome_serializes_warnings() {
    let outcome = run("if (true) { var x = 1; }\nx = 2;\n", "let");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["warnings"][0]["transform"], "let");
    assert_eq!(json["warnings"][0]["line"], 1);
    assert_eq!(json["warnings"][0]["message"], "Unable to transform var");
}

#[test]
fn test_transforms_run_in_given_order() {
    // multi-var first lets `let` judge each name on its own.
    let source = "var a = 1, b = 2;\nb = 3;\n";
    assert_eq!(run(source, "multi-var,let").code, "const a = 1;\nlet b = 2;\nb = 3;\n");
    assert_eq!(run(source, "let,multi-var").code, "let a = 1;\nlet b = 2;\nb = 3;\n");
}
