//! Comment attachment: which node owns which gap comment.

use remod_parser::parser::NodeKind;
use remod_parser::{ParsedFile, parse};

fn comment_texts<'a>(file: &ParsedFile, source: &'a str, ids: &[remod_parser::CommentId]) -> Vec<&'a str> {
    ids.iter()
        .map(|id| file.arena.comment(*id).unwrap().get_text(source))
        .collect()
}

#[test]
fn test_leading_comments_attach_to_next_statement() {
    let source = "// constructor\nfunction C() {}\n/** bar */\nC.prototype.bar = function() {};\n";
    let file = parse(source).unwrap();
    let stmts = &file.arena.statement_list(file.root).unwrap().statements;
    assert_eq!(
        comment_texts(&file, source, file.arena.leading_comments(stmts[0])),
        ["// constructor"]
    );
    assert_eq!(
        comment_texts(&file, source, file.arena.leading_comments(stmts[1])),
        ["/** bar */"]
    );
}

#[test]
fn test_same_line_comment_trails_previous_statement() {
    let source = "a(); /* x */ // y\nb();";
    let file = parse(source).unwrap();
    let stmts = &file.arena.statement_list(file.root).unwrap().statements;
    assert_eq!(
        comment_texts(&file, source, file.arena.trailing_comments(stmts[0])),
        ["/* x */", "// y"]
    );
    assert_eq!(file.arena.trailing_end(stmts[0]), source.find('\n').unwrap() as u32);
}

#[test]
fn test_comment_before_closing_brace_stays_with_container() {
    let source = "function f() {\n  a();\n  // done\n}";
    let file = parse(source).unwrap();
    let function = file.arena.statement_list(file.root).unwrap().statements[0];
    let Some(NodeKind::FunctionDeclaration(data)) = file.arena.kind(function) else {
        panic!("expected function");
    };
    let body = file.arena.statement_list(data.body).unwrap();
    assert!(file.arena.attached_comments(body.statements[0]).is_none());
}

#[test]
fn test_object_literal_members_own_their_comments() {
    let source = "o = {\n  // first\n  a: 1, // after a\n  b: 2\n};";
    let file = parse(source).unwrap();
    let stmt = file.arena.statement_list(file.root).unwrap().statements[0];
    let Some(NodeKind::ExpressionStatement { expression }) = file.arena.kind(stmt) else {
        panic!("expected expression statement");
    };
    let Some(NodeKind::BinaryExpression { right, .. }) = file.arena.kind(*expression) else {
        panic!("expected assignment");
    };
    let Some(NodeKind::ObjectLiteral { properties }) = file.arena.kind(*right) else {
        panic!("expected object");
    };
    let first = properties.nodes[0];
    assert_eq!(
        comment_texts(&file, source, file.arena.leading_comments(first)),
        ["// first"]
    );
    assert_eq!(
        comment_texts(&file, source, file.arena.trailing_comments(first)),
        ["// after a"]
    );
}
