//! End-to-end tests for the `class` transform: parse, transform, print.

use remod_common::LineMap;
use remod_emitter::print;
use remod_parser::parse;
use remod_transforms::{TransformSet, WarningReporter, run_transforms};

fn transform(source: &str) -> (String, Vec<String>) {
    let mut file = parse(source).unwrap();
    let mut transforms = TransformSet::parse("class").unwrap().instantiate();
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

fn assert_unchanged(source: &str) {
    let (output, _) = transform(source);
    assert_eq!(output, source);
}

#[test]
fn test_prototype_method_becomes_class() {
    let (output, warnings) = transform("function C(){}; C.prototype.bar = function(){ return 1; };");
    assert_eq!(output, "class C {\n  bar() { return 1; }\n}");
    assert!(warnings.is_empty());
}

#[test]
fn test_empty_method_is_kept() {
    let (output, _) = transform("function C() {}\nC.prototype.noop = function() {};\n");
    assert_eq!(output, "class C {\n  noop() {}\n}\n");
}

#[test]
fn test_constructor_with_parameters_is_emitted() {
    let source = "function Point(x) {\n  this.x = x;\n}\nPoint.prototype.getX = function() {\n  return this.x;\n};\n";
    let (output, _) = transform(source);
    assert_eq!(
        output,
        "class Point {\n  constructor(x) {\n    this.x = x;\n  }\n\n  getX() {\n    return this.x;\n  }\n}\n"
    );
}

#[test]
fn test_var_assigned_constructor() {
    let (output, _) = transform("var C = function() {};\nC.prototype.m = function() {};\n");
    assert_eq!(output, "class C {\n  m() {}\n}\n");
}

#[test]
fn test_inheritance_rewrites_super_calls() {
    let source = "function Dog(name) {\n  Animal.call(this, name);\n}\nutil.inherits(Dog, Animal);\nDog.prototype.bark = function() {\n  Animal.prototype.speak.call(this, 'woof');\n};\n";
    let (output, _) = transform(source);
    assert_eq!(
        output,
        "class Dog extends Animal {\n  constructor(name) {\n    super(name);\n  }\n\n  bark() {\n    super.speak('woof');\n  }\n}\n"
    );
}

#[test]
fn test_object_create_inheritance_and_constructor_fix() {
    let source = "function B() {}\nB.prototype = Object.create(A.prototype);\nB.prototype.constructor = B;\nB.prototype.m = function() {};\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class B extends A {\n  m() {}\n}\n");
}

#[test]
fn test_apply_arguments_becomes_spread_super() {
    let source = "function B() {\n  A.apply(this, arguments);\n}\nB.prototype = new A();\nB.prototype.m = function() {};\n";
    let (output, _) = transform(source);
    assert!(output.contains("class B extends A {"), "{output}");
    assert!(output.contains("super(...arguments);"), "{output}");
}

#[test]
fn test_accessors_from_define_property() {
    let source = "function T() {}\nObject.defineProperty(T.prototype, 'size', {\n  get: function() { return 1; },\n  set: function(v) {}\n});\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class T {\n  get size() { return 1; }\n\n  set size(v) {}\n}\n");
}

#[test]
fn test_unsupported_descriptor_warns() {
    let source = "function T() {}\nObject.defineProperty(T.prototype, 'x', { value: 1 });\n";
    let (output, warnings) = transform(source);
    assert_eq!(output, source);
    assert_eq!(
        warnings,
        vec!["2:  warning  Unsupported Object.defineProperty descriptor  (class)".to_string()]
    );
}

#[test]
fn test_prototype_object_literal() {
    let source = "function P() {}\nP.prototype = {\n  a: function() { return 1; },\n  b: function() {}\n};\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class P {\n  a() { return 1; }\n\n  b() {}\n}\n");
}

#[test]
fn test_static_method_follows_prototype_members() {
    let source = "function S() {}\nS.prototype.a = function() {};\nS.make = function() {};\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class S {\n  a() {}\n\n  static make() {}\n}\n");
}

#[test]
fn test_static_only_function_is_not_a_class() {
    assert_unchanged("function S() {}\nS.create = function() {};\n");
}

#[test]
fn test_plain_function_is_not_a_class() {
    assert_unchanged("function helper() { return 1; }\nhelper();\n");
}

#[test]
fn test_run_stops_at_unrelated_statement() {
    let source = "function A() {}\nA.prototype.a = function() {};\nfoo();\nA.prototype.b = function() {};\n";
    let (output, _) = transform(source);
    assert_eq!(
        output,
        "class A {\n  a() {}\n}\nfoo();\nA.prototype.b = function() {};\n"
    );
}

#[test]
fn test_later_definition_overwrites_method() {
    let source = "function D() {}\nD.prototype.m = function() { return 1; };\nD.prototype.m = function() { return 2; };\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class D {\n  m() { return 2; }\n}\n");
}

#[test]
fn test_this_before_super_call_rejects_class() {
    assert_unchanged(
        "function B(x) {\n  this.x = x;\n  A.call(this, x);\n}\nB.prototype = Object.create(A.prototype);\nB.prototype.m = function() {};\n",
    );
}

#[test]
fn test_missing_super_call_rejects_class() {
    assert_unchanged(
        "function B(x) {\n  this.x = x;\n}\nB.prototype = Object.create(A.prototype);\nB.prototype.m = function() {};\n",
    );
}

#[test]
fn test_self_referencing_method_is_not_absorbed() {
    let source = "function C() {}\nC.prototype.a = function() {};\nC.prototype.f = function f() { return f; };\n";
    let (output, _) = transform(source);
    assert!(output.starts_with("class C {\n  a() {}\n}\n"), "{output}");
    assert!(output.ends_with("C.prototype.f = function f() { return f; };\n"), "{output}");
}

#[test]
fn test_comments_move_with_their_members() {
    let source = "/** A point. */\nfunction P(x) {\n  this.x = x;\n}\n// Length of the vector.\nP.prototype.len = function() {\n  return this.x;\n};\n";
    let (output, _) = transform(source);
    assert!(output.contains("/** A point. */\nclass P {"), "{output}");
    assert!(output.contains("  // Length of the vector.\n  len() {"), "{output}");
    assert_eq!(output.matches("Length of the vector").count(), 1);
    assert_eq!(output.matches("A point").count(), 1);
}

#[test]
fn test_classes_in_function_bodies() {
    let source = "function outer() {\n  function C() {}\n  C.prototype.m = function() {};\n  return C;\n}\n";
    let (output, _) = transform(source);
    assert!(output.contains("class C {"), "{output}");
    assert!(output.contains("return C;"), "{output}");
    assert!(!output.contains("prototype"), "{output}");
}

#[test]
fn test_two_classes_in_one_list() {
    let source = "function A() {}\nA.prototype.a = function() {};\nfunction B() {}\nB.prototype.b = function() {};\n";
    let (output, _) = transform(source);
    assert_eq!(output, "class A {\n  a() {}\n}\nclass B {\n  b() {}\n}\n");
}

#[test]
fn test_constructor_used_before_declaration_is_kept() {
    assert_unchanged("new C();\nfunction C() {}\nC.prototype.m = function() {};\n");
}

#[test]
fn test_unrelated_statement_before_constructor() {
    let (output, _) = transform("foo();\nfunction C() {}\nC.prototype.m = function() {};\n");
    assert_eq!(output, "foo();\nclass C {\n  m() {}\n}\n");
}
