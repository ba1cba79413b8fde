//! Printer tests: edits applied by hand to parsed trees.

use remod_emitter::{PrintOptions, Printer, print};
use remod_parser::parser::{
    ArrowFunctionData, AttachedComments, ClassData, DeclarationKind, MethodData, MethodKind, NodeKind,
    VariableDeclarationListData,
};
use remod_parser::{NodeIndex, NodeList, ParsedFile, parse};

fn statements(file: &ParsedFile) -> Vec<NodeIndex> {
    file.arena.statement_list(file.root).unwrap().statements.clone()
}

fn render(file: &ParsedFile, source: &str) -> String {
    print(&file.arena, source, file.root)
}

/// Give a synthesized statement the place of `anchor` in its container.
fn anchor_at(file: &mut ParsedFile, node: NodeIndex, anchor: NodeIndex) {
    let (pos, end) = {
        let anchor = file.arena.get(anchor).unwrap();
        (anchor.pos, anchor.end)
    };
    let node = file.arena.get_mut(node).unwrap();
    node.pos = pos;
    node.end = end;
    node.origin = anchor;
}

#[test]
fn test_untouched_tree_is_byte_identical() {
    let source = "/* head */\nvar a = 1; // one\n\n\tif (a) {\n\t\tb();\n\t}\n";
    let file = parse(source).unwrap();
    assert_eq!(render(&file, source), source);
}

#[test]
fn test_declaration_keyword_is_reprinted() {
    let source = "var a = 1;\nvar b = 2;\n";
    let mut file = parse(source).unwrap();
    let first = statements(&file)[0];
    let Some(NodeKind::VariableStatement { declaration_list }) = file.arena.kind(first) else {
        panic!("expected variable statement");
    };
    let list = *declaration_list;
    if let Some(NodeKind::VariableDeclarationList(data)) =
        file.arena.get_mut(list).map(|node| &mut node.kind)
    {
        data.kind = DeclarationKind::Const;
    }
    file.arena.mark_modified(list);
    assert_eq!(render(&file, source), "const a = 1;\nvar b = 2;\n");
}

#[test]
fn test_removed_statement_takes_its_comments() {
    let source = "a();\n// about b\nb(); // b trailer\nc();\n";
    let mut file = parse(source).unwrap();
    let stmts = statements(&file);
    file.arena.set_statements(file.root, vec![stmts[0], stmts[2]]);
    assert_eq!(render(&file, source), "a();\nc();\n");
}

#[test]
fn test_removing_first_statement_keeps_following_layout() {
    let source = "\"use strict\";\n\nfoo();\n";
    let mut file = parse(source).unwrap();
    let stmts = statements(&file);
    file.arena.set_statements(file.root, vec![stmts[1]]);
    assert_eq!(render(&file, source), "foo();\n");
}

#[test]
fn test_synthesized_expression_is_spliced_into_call() {
    let source = "f(function(x) { return x; });";
    let mut file = parse(source).unwrap();
    let statement = statements(&file)[0];
    let Some(NodeKind::ExpressionStatement { expression: call }) = file.arena.kind(statement)
    else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::CallExpression { arguments, .. }) = file.arena.kind(*call) else {
        panic!("expected call");
    };
    let function = arguments.nodes[0];
    let Some(NodeKind::FunctionExpression(data)) = file.arena.kind(function) else {
        panic!("expected function expression");
    };
    let parameters = data.parameters.clone();
    let body = file.arena.statement_list(data.body).unwrap().statements[0];
    let Some(NodeKind::ReturnStatement { expression }) = file.arena.kind(body) else {
        panic!("expected return");
    };
    let returned = *expression;

    let arrow = file.arena.add_synthesized(NodeKind::ArrowFunction(ArrowFunctionData {
        parameters,
        body: returned,
        is_async: false,
        bare_parameter: true,
    }));
    assert!(file.arena.replace_node(function, arrow));
    assert_eq!(render(&file, source), "f(x => x);");
}

#[test]
fn test_statement_split_in_two_keeps_neighbours() {
    let source = "var a = 1, b = 2;\nfoo();\n";
    let mut file = parse(source).unwrap();
    let stmts = statements(&file);
    let Some(NodeKind::VariableStatement { declaration_list }) = file.arena.kind(stmts[0]) else {
        panic!("expected variable statement");
    };
    let Some(NodeKind::VariableDeclarationList(data)) = file.arena.kind(*declaration_list) else {
        panic!("expected declaration list");
    };
    let declarations = data.declarations.nodes.clone();

    let mut replacements = Vec::new();
    for declaration in declarations {
        let list = file
            .arena
            .add_synthesized(NodeKind::VariableDeclarationList(VariableDeclarationListData {
                kind: DeclarationKind::Var,
                declarations: NodeList::new(vec![declaration]),
                original_kind: DeclarationKind::Var,
            }));
        let statement = file.arena.add_synthesized(NodeKind::VariableStatement {
            declaration_list: list,
        });
        anchor_at(&mut file, statement, stmts[0]);
        replacements.push(statement);
    }
    replacements.push(stmts[1]);
    file.arena.set_statements(file.root, replacements);

    assert_eq!(render(&file, source), "var a = 1;\nvar b = 2;\nfoo();\n");
}

/// Replace `function C() {}` and the `C.prototype.m = function...` after it
/// with one synthesized class, moving the constructor's comments onto it.
fn fold_into_class(file: &mut ParsedFile) {
    let stmts = statements(file);
    let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(stmts[1]) else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::BinaryExpression { right, .. }) = file.arena.kind(*expression) else {
        panic!("expected assignment");
    };
    let Some(NodeKind::FunctionExpression(function)) = file.arena.kind(*right) else {
        panic!("expected function expression");
    };
    let (parameters, body) = (function.parameters.clone(), function.body);

    let name = file.arena.synthesize_identifier("m");
    let method = file.arena.add_synthesized(NodeKind::MethodDeclaration(MethodData {
        kind: MethodKind::Method,
        is_static: false,
        name,
        parameters,
        body,
        is_async: false,
        is_generator: false,
    }));
    let class_name = file.arena.synthesize_identifier("C");
    let class = file.arena.add_synthesized(NodeKind::ClassDeclaration(ClassData {
        name: class_name,
        heritage: NodeIndex::NONE,
        members: NodeList::new(vec![method]),
    }));
    anchor_at(file, class, stmts[0]);
    let comments = AttachedComments {
        leading: file.arena.leading_comments(stmts[0]).iter().copied().collect(),
        ..AttachedComments::default()
    };
    file.arena.set_attached_comments(class, comments);
    file.arena.set_attached_comments(stmts[0], AttachedComments::default());
    let mut replaced = vec![class];
    replaced.extend_from_slice(&stmts[2..]);
    file.arena.set_statements(file.root, replaced);
}

#[test]
fn test_synthesized_class_reindents_copied_bodies() {
    let source = "function C() {}\nC.prototype.m = function() {\n  return 1;\n};\n";
    let mut file = parse(source).unwrap();
    fold_into_class(&mut file);
    assert_eq!(
        render(&file, source),
        "class C {\n  m() {\n    return 1;\n  }\n}\n"
    );
}

#[test]
fn test_crlf_source_keeps_crlf_in_synthesized_code() {
    let source = "// head\r\nfunction C() {}\r\nC.prototype.m = function() {\r\n  return 1;\r\n};\r\nvar x = 1;\r\n";
    let mut file = parse(source).unwrap();
    fold_into_class(&mut file);
    assert_eq!(
        render(&file, source),
        "// head\r\nclass C {\r\n  m() {\r\n    return 1;\r\n  }\r\n}\r\nvar x = 1;\r\n"
    );
}

#[test]
fn test_byte_order_mark_is_not_copied_as_indentation() {
    let source = "\u{feff}function C() {}\nC.prototype.m = function() {};\n";
    let mut file = parse(source).unwrap();
    fold_into_class(&mut file);
    assert_eq!(render(&file, source), "\u{feff}class C {\n  m() {}\n}\n");
}

#[test]
fn test_synthesized_exponent_adds_parentheses() {
    let source = "x = a + 1;";
    let mut file = parse(source).unwrap();
    let statement = statements(&file)[0];
    let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(statement) else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::BinaryExpression { right: sum, .. }) = file.arena.kind(*expression) else {
        panic!("expected assignment");
    };
    let sum = *sum;
    let two = file.arena.add_synthesized(NodeKind::NumericLiteral { text: "2".into() });
    let power = file.arena.add_synthesized(NodeKind::BinaryExpression {
        left: sum,
        operator: remod_scanner::SyntaxKind::AsteriskAsteriskToken,
        right: two,
    });
    assert!(file.arena.replace_node(sum, power));
    assert_eq!(render(&file, source), "x = (a + 1) ** 2;");
}

#[test]
fn test_explicit_indent_unit_is_used() {
    let source = "function C() {}";
    let mut file = parse(source).unwrap();
    let stmts = statements(&file);
    let body = file.arena.add_synthesized(NodeKind::Block(
        remod_parser::parser::StatementList::synthesized(Vec::new()),
    ));
    let name = file.arena.synthesize_identifier("constructor");
    let constructor = file.arena.add_synthesized(NodeKind::MethodDeclaration(MethodData {
        kind: MethodKind::Constructor,
        is_static: false,
        name,
        parameters: NodeList::new(Vec::new()),
        body,
        is_async: false,
        is_generator: false,
    }));
    let class_name = file.arena.synthesize_identifier("C");
    let class = file.arena.add_synthesized(NodeKind::ClassDeclaration(ClassData {
        name: class_name,
        heritage: NodeIndex::NONE,
        members: NodeList::new(vec![constructor]),
    }));
    anchor_at(&mut file, class, stmts[0]);
    file.arena.set_statements(file.root, vec![class]);

    let mut printer = Printer::new(
        &file.arena,
        source,
        PrintOptions {
            indent_unit: "\t".to_string(),
            ..PrintOptions::default()
        },
    );
    printer.print_node(file.root);
    assert_eq!(printer.finish(), "class C {\n\tconstructor() {}\n}");
}
