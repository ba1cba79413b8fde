//! Parser integration tests: tree shapes, spans and error reporting.

use remod_parser::parser::{DeclarationKind, MethodKind, NodeKind};
use remod_parser::{NodeIndex, ParsedFile, parse};

fn statements(file: &ParsedFile) -> Vec<NodeIndex> {
    file.arena.statement_list(file.root).unwrap().statements.clone()
}

fn text<'a>(file: &ParsedFile, source: &'a str, node: NodeIndex) -> &'a str {
    let node = file.arena.get(node).unwrap();
    &source[node.pos as usize..node.end as usize]
}

#[test]
fn test_statement_spans_include_semicolons() {
    let source = "var foo = 10;\n[1, 2, 3].map(function(x) { return x*x });";
    let file = parse(source).unwrap();
    let stmts = statements(&file);
    assert_eq!(stmts.len(), 2);
    assert_eq!(text(&file, source, stmts[0]), "var foo = 10;");
    assert_eq!(
        text(&file, source, stmts[1]),
        "[1, 2, 3].map(function(x) { return x*x });"
    );
}

#[test]
fn test_asi_after_line_break() {
    let source = "a = 1\nb = 2\n";
    let file = parse(source).unwrap();
    let stmts = statements(&file);
    assert_eq!(stmts.len(), 2);
    assert_eq!(text(&file, source, stmts[0]), "a = 1");
}

#[test]
fn test_return_is_restricted_production() {
    let file = parse("function f() { return\n1; }").unwrap();
    let function = statements(&file)[0];
    let Some(NodeKind::FunctionDeclaration(data)) = file.arena.kind(function) else {
        panic!("expected function declaration");
    };
    let body = file.arena.statement_list(data.body).unwrap();
    assert_eq!(body.statements.len(), 2);
    assert!(matches!(
        file.arena.kind(body.statements[0]),
        Some(NodeKind::ReturnStatement { expression }) if expression.is_none()
    ));
}

#[test]
fn test_let_and_const_declarations() {
    let file = parse("let a = 1; const b = 2; var c;").unwrap();
    let kinds: Vec<_> = statements(&file)
        .into_iter()
        .map(|stmt| {
            let Some(NodeKind::VariableStatement { declaration_list }) = file.arena.kind(stmt)
            else {
                panic!("expected variable statement");
            };
            let Some(NodeKind::VariableDeclarationList(list)) = file.arena.kind(*declaration_list)
            else {
                panic!("expected declaration list");
            };
            list.kind
        })
        .collect();
    assert_eq!(
        kinds,
        [DeclarationKind::Let, DeclarationKind::Const, DeclarationKind::Var]
    );
}

#[test]
fn test_let_as_identifier() {
    let file = parse("let = 5;").unwrap();
    assert!(matches!(
        file.arena.kind(statements(&file)[0]),
        Some(NodeKind::ExpressionStatement { .. })
    ));
}

#[test]
fn test_class_members() {
    let source = "class A extends B {\n  constructor(x) { super(x); }\n  static make() {}\n  get size() { return 1; }\n}";
    let file = parse(source).unwrap();
    let Some(NodeKind::ClassDeclaration(class)) = file.arena.kind(statements(&file)[0]) else {
        panic!("expected class");
    };
    assert!(class.heritage.is_some());
    let members: Vec<_> = class
        .members
        .nodes
        .iter()
        .map(|&member| match file.arena.kind(member) {
            Some(NodeKind::MethodDeclaration(method)) => (method.kind, method.is_static),
            other => panic!("unexpected member {other:?}"),
        })
        .collect();
    assert_eq!(
        members,
        [
            (MethodKind::Constructor, false),
            (MethodKind::Method, true),
            (MethodKind::Get, false)
        ]
    );
}

#[test]
fn test_object_literal_members() {
    let source = "x = { a: 1, b, get c() { return 2; }, d() {}, 'e': function() {}, [f]: 3, ...g };";
    let file = parse(source).unwrap();
    let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(statements(&file)[0])
    else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::BinaryExpression { right, .. }) = file.arena.kind(*expression) else {
        panic!("expected assignment");
    };
    let Some(NodeKind::ObjectLiteral { properties }) = file.arena.kind(*right) else {
        panic!("expected object literal");
    };
    let names: Vec<_> = properties
        .nodes
        .iter()
        .map(|&property| file.arena.kind(property).unwrap().name())
        .collect();
    assert_eq!(
        names,
        [
            "PropertyAssignment",
            "ShorthandPropertyAssignment",
            "MethodDeclaration",
            "MethodDeclaration",
            "PropertyAssignment",
            "PropertyAssignment",
            "SpreadElement"
        ]
    );
}

#[test]
fn test_arrow_function_forms() {
    let source = "a = x => x; b = (x, y = 1, ...z) => { return x; }; c = async () => 1; d = async y => y;";
    let file = parse(source).unwrap();
    let mut arrows = 0;
    for stmt in statements(&file) {
        let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(stmt) else {
            panic!("expected expression statement");
        };
        let Some(NodeKind::BinaryExpression { right, .. }) = file.arena.kind(*expression) else {
            panic!("expected assignment");
        };
        if let Some(NodeKind::ArrowFunction(arrow)) = file.arena.kind(*right) {
            arrows += 1;
            assert!(!arrow.parameters.is_empty() || arrow.is_async);
        }
    }
    assert_eq!(arrows, 4);
}

#[test]
fn test_template_literal_with_substitutions() {
    let source = "s = `a${b}c${d + `nested ${e}`}f`;";
    let file = parse(source).unwrap();
    let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(statements(&file)[0])
    else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::BinaryExpression { right, .. }) = file.arena.kind(*expression) else {
        panic!("expected assignment");
    };
    let Some(NodeKind::TemplateLiteral(template)) = file.arena.kind(*right) else {
        panic!("expected template");
    };
    assert_eq!(template.quasis, ["`a${", "}c${", "}f`"]);
    assert_eq!(template.expressions.len(), 2);
}

#[test]
fn test_regex_and_division() {
    let source = "x = a / b / c; y = /ab+c/gi.test(s);";
    let file = parse(source).unwrap();
    assert_eq!(statements(&file).len(), 2);
}

#[test]
fn test_for_statement_variants() {
    let source = "for (var i = 0; i < n; i++) {}\nfor (var k in o) {}\nfor (const v of list) {}\nfor (;;) break;";
    let file = parse(source).unwrap();
    let names: Vec<_> = statements(&file)
        .into_iter()
        .map(|stmt| file.arena.kind(stmt).unwrap().name())
        .collect();
    assert_eq!(
        names,
        [
            "ForStatement",
            "ForInStatement",
            "ForOfStatement",
            "ForStatement"
        ]
    );
}

#[test]
fn test_in_operator_inside_for_initializer_parentheses() {
    let file = parse("for (var x = ('a' in o); x; ) {}").unwrap();
    assert!(matches!(
        file.arena.kind(statements(&file)[0]),
        Some(NodeKind::ForStatement { .. })
    ));
}

#[test]
fn test_switch_try_labels() {
    let source = "outer: for (;;) { switch (x) { case 1: f(); break outer; default: g(); } }\ntry { h(); } catch (e) { } finally { }";
    let file = parse(source).unwrap();
    assert_eq!(statements(&file).len(), 2);
}

#[test]
fn test_parents_are_linked() {
    let source = "function f(a) { return a + 1; }";
    let file = parse(source).unwrap();
    for index in 0..file.arena.len() {
        let index = NodeIndex(index as u32);
        for child in file.arena.children(index) {
            assert_eq!(file.arena.parent(child), index);
        }
    }
}

#[test]
fn test_error_on_unbalanced_braces() {
    let err = parse("function f() {\n  return 1;\n").unwrap_err();
    assert_eq!(err.message, "'}' expected");
    assert_eq!(err.line, 3);
}

#[test]
fn test_error_on_module_syntax() {
    let err = parse("import x from 'y';").unwrap_err();
    assert_eq!(err.message, "Module declarations are not supported");
}
