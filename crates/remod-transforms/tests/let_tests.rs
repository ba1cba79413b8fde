//! End-to-end tests for the `let` transform.

use remod_common::LineMap;
use remod_emitter::print;
use remod_parser::parse;
use remod_transforms::{TransformSet, WarningReporter, run_transforms};

fn transform(source: &str) -> (String, Vec<String>) {
    let mut file = parse(source).unwrap();
    let mut transforms = TransformSet::parse("let").unwrap().instantiate();
    let line_map = LineMap::build(source);
    let mut reporter = WarningReporter::new();
    run_transforms(
        &mut transforms,
        &mut file.arena,
        source,
        file.root,
        &line_map,
        &mut reporter,
    )
    .unwrap();
    let warnings = reporter
        .into_sorted()
        .iter()
        .map(ToString::to_string)
        .collect();
    (print(&file.arena, source, file.root), warnings)
}

#[test]
fn test_var_used_outside_block_warns() {
    let source = "if (true) { var x = 10; }\n x = 12;\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(
        warnings,
        vec!["1:  warning  Unable to transform var  (let)".to_string()]
    );
}

#[test]
fn test_never_reassigned_becomes_const() {
    let (output, warnings) = transform("var a = 1;\nfoo(a);\n");
    assert_eq!(output, "const a = 1;\nfoo(a);\n");
    assert!(warnings.is_empty());
}

#[test]
fn test_reassigned_becomes_let() {
    let (output, _) = transform("var a = 1;\na = 2;\nvar b;\nb++;\n");
    assert_eq!(output, "let a = 1;\na = 2;\nlet b;\nb++;\n");
}

#[test]
fn test_uninitialized_becomes_let() {
    let (output, _) = transform("var a;\n");
    assert_eq!(output, "let a;\n");
}

#[test]
fn test_loop_counter_becomes_let() {
    let (output, _) = transform("for (var i = 0; i < 3; i++) {\n  foo(i);\n}\n");
    assert_eq!(output, "for (let i = 0; i < 3; i++) {\n  foo(i);\n}\n");
}

#[test]
fn test_closure_over_loop_variable_warns() {
    let source = "for (var i = 0; i < 3; i++) {\n  fns.push(function() { return i; });\n}\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_use_before_declaration_warns() {
    let source = "x = 1;\nvar x;\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(
        warnings,
        vec!["2:  warning  Unable to transform var  (let)".to_string()]
    );
}

#[test]
fn test_redeclaration_warns_for_each_declaration() {
    let source = "var a = 1;\nvar a = 2;\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(warnings.len(), 2);
}

#[test]
fn test_function_scoped_var() {
    let (output, _) = transform("function f() {\n  var a = 1;\n  return a;\n}\n");
    assert_eq!(output, "function f() {\n  const a = 1;\n  return a;\n}\n");
}

#[test]
fn test_shadowed_name_does_not_count_as_write() {
    let (output, _) = transform("var a = 1;\nfunction f(a) {\n  a = 2;\n}\n");
    assert_eq!(output, "const a = 1;\nfunction f(a) {\n  a = 2;\n}\n");
}

#[test]
fn test_mixed_list_takes_weakest_kind() {
    let (output, _) = transform("var a = 1, b = 2;\nb = 3;\n");
    assert_eq!(output, "let a = 1, b = 2;\nb = 3;\n");
}

#[test]
fn test_destructuring_declaration() {
    let (output, _) = transform("var { a, b } = obj;\nfoo(a, b);\n");
    assert_eq!(output, "const { a, b } = obj;\nfoo(a, b);\n");
}

#[test]
fn test_case_clause_var_used_by_later_case_warns() {
    let source = "switch (k) {\n  case 1: var z = 1; break;\n  case 2: z = 2;\n}\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(
        warnings,
        vec!["2:  warning  Unable to transform var  (let)".to_string()]
    );
}

#[test]
fn test_case_clause_var_used_in_own_clause() {
    let (output, warnings) = transform("switch (k) {\n  case 1: var z = 1; f(z); break;\n}\n");
    assert_eq!(output, "switch (k) {\n  case 1: const z = 1; f(z); break;\n}\n");
    assert!(warnings.is_empty());
}

#[test]
fn test_hoisted_function_called_before_declaration_warns() {
    let source = "function f() {\n  return g();\n  function g() { return v; }\n  var v = 1;\n}\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(
        warnings,
        vec!["4:  warning  Unable to transform var  (let)".to_string()]
    );
}

#[test]
fn test_function_reading_var_after_declaration() {
    let (output, warnings) = transform("var v = 1;\ng();\nfunction g() { return v; }\n");
    assert_eq!(output, "const v = 1;\ng();\nfunction g() { return v; }\n");
    assert!(warnings.is_empty());
}
