//! Structural printing for nodes with no source text of their own.

use super::Printer;
use remod_parser::parser::{
    ArrowFunctionData, ClassData, FunctionData, MethodData, MethodKind, NodeKind, StatementList,
    TemplateData,
};
use remod_parser::{NodeIndex, NodeList};
use remod_scanner::SyntaxKind;

// Operator precedence levels used to decide where parentheses are needed.
const PREC_COMMA: u8 = 0;
const PREC_ASSIGNMENT: u8 = 2;
const PREC_CONDITIONAL: u8 = 3;
const PREC_BINARY_BASE: u8 = 3;
const PREC_EXPONENT: u8 = PREC_BINARY_BASE + 12;
const PREC_UNARY: u8 = 17;
const PREC_POSTFIX: u8 = 18;
const PREC_MEMBER: u8 = 19;
const PREC_PRIMARY: u8 = 20;

impl<'a> Printer<'a> {
    pub(super) fn print_synthesized(&mut self, idx: NodeIndex) {
        self.print_structural(idx);
    }

    /// Print a node from its fields alone. Children go back through
    /// `print_node`, so original subtrees still copy their source.
    pub(super) fn print_structural(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match &node.kind {
            NodeKind::Program(list) => self.print_statement_lines(list, ""),
            NodeKind::Block(list) => self.print_block(list),
            NodeKind::EmptyStatement => self.writer.write(";"),
            NodeKind::ExpressionStatement { expression } => {
                self.print_node(*expression);
                self.writer.write(";");
            }
            NodeKind::VariableStatement { declaration_list } => {
                self.print_node(*declaration_list);
                self.writer.write(";");
            }
            NodeKind::VariableDeclarationList(data) => {
                self.writer.write(data.kind.keyword());
                self.writer.write(" ");
                self.print_comma_list(&data.declarations.nodes);
            }
            NodeKind::VariableDeclaration { name, initializer }
            | NodeKind::Parameter {
                name, initializer, ..
            } => {
                if let NodeKind::Parameter { is_rest: true, .. } = &node.kind {
                    self.writer.write("...");
                }
                self.print_node(*name);
                if initializer.is_some() {
                    self.writer.write(" = ");
                    self.print_node(*initializer);
                }
            }
            NodeKind::FunctionDeclaration(data) | NodeKind::FunctionExpression(data) => {
                self.print_function(data);
            }
            NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
                self.print_class(data);
            }
            NodeKind::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => {
                self.writer.write("if (");
                self.print_node(*expression);
                self.writer.write(") ");
                self.print_node(*then_statement);
                if else_statement.is_some() {
                    self.writer.write(" else ");
                    self.print_node(*else_statement);
                }
            }
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            } => {
                self.writer.write("for (");
                self.print_node(*initializer);
                self.writer.write(";");
                if condition.is_some() {
                    self.writer.write(" ");
                    self.print_node(*condition);
                }
                self.writer.write(";");
                if incrementor.is_some() {
                    self.writer.write(" ");
                    self.print_node(*incrementor);
                }
                self.writer.write(") ");
                self.print_node(*statement);
            }
            NodeKind::ForInStatement {
                initializer,
                expression,
                statement,
            }
            | NodeKind::ForOfStatement {
                initializer,
                expression,
                statement,
            } => {
                let keyword = if matches!(node.kind, NodeKind::ForInStatement { .. }) {
                    " in "
                } else {
                    " of "
                };
                self.writer.write("for (");
                self.print_node(*initializer);
                self.writer.write(keyword);
                self.print_node(*expression);
                self.writer.write(") ");
                self.print_node(*statement);
            }
            NodeKind::WhileStatement {
                expression,
                statement,
            } => {
                self.writer.write("while (");
                self.print_node(*expression);
                self.writer.write(") ");
                self.print_node(*statement);
            }
            NodeKind::WithStatement {
                expression,
                statement,
            } => {
                self.writer.write("with (");
                self.print_node(*expression);
                self.writer.write(") ");
                self.print_node(*statement);
            }
            NodeKind::DoStatement {
                statement,
                expression,
            } => {
                self.writer.write("do ");
                self.print_node(*statement);
                self.writer.write(" while (");
                self.print_node(*expression);
                self.writer.write(");");
            }
            NodeKind::ReturnStatement { expression } => {
                self.print_keyword_statement("return", *expression);
            }
            NodeKind::ThrowStatement { expression } => {
                self.print_keyword_statement("throw", *expression);
            }
            NodeKind::BreakStatement { label } => self.print_keyword_statement("break", *label),
            NodeKind::ContinueStatement { label } => {
                self.print_keyword_statement("continue", *label);
            }
            NodeKind::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                self.writer.write("try ");
                self.print_node(*try_block);
                if catch_clause.is_some() {
                    self.writer.write(" ");
                    self.print_node(*catch_clause);
                }
                if finally_block.is_some() {
                    self.writer.write(" finally ");
                    self.print_node(*finally_block);
                }
            }
            NodeKind::CatchClause { variable, block } => {
                self.writer.write("catch ");
                if variable.is_some() {
                    self.writer.write("(");
                    self.print_node(*variable);
                    self.writer.write(") ");
                }
                self.print_node(*block);
            }
            NodeKind::SwitchStatement {
                expression,
                clauses,
            } => {
                let indent = self.current_indent();
                self.writer.write("switch (");
                self.print_node(*expression);
                self.writer.write(") {");
                for &clause in &clauses.nodes {
                    self.writer.write_line(&indent);
                    self.print_node(clause);
                }
                self.writer.write_line(&indent);
                self.writer.write("}");
            }
            NodeKind::CaseClause {
                expression,
                statements,
            } => {
                if expression.is_some() {
                    self.writer.write("case ");
                    self.print_node(*expression);
                    self.writer.write(":");
                } else {
                    self.writer.write("default:");
                }
                let indent = format!("{}{}", self.current_indent(), self.indent_unit());
                for &statement in &statements.statements {
                    self.writer.write_line(&indent);
                    self.print_node(statement);
                }
            }
            NodeKind::LabeledStatement { label, statement } => {
                self.print_node(*label);
                self.writer.write(": ");
                self.print_node(*statement);
            }
            NodeKind::DebuggerStatement => self.writer.write("debugger;"),
            NodeKind::PropertyAssignment { name, initializer } => {
                self.print_node(*name);
                self.writer.write(": ");
                self.print_node(*initializer);
            }
            NodeKind::ShorthandPropertyAssignment { name, initializer } => {
                self.print_node(*name);
                if initializer.is_some() {
                    self.writer.write(" = ");
                    self.print_node(*initializer);
                }
            }
            NodeKind::MethodDeclaration(data) => self.print_method(data),
            NodeKind::ComputedPropertyName { expression } => {
                self.writer.write("[");
                self.print_node(*expression);
                self.writer.write("]");
            }
            NodeKind::SpreadElement { expression } => {
                self.writer.write("...");
                self.print_node(*expression);
            }
            NodeKind::Identifier { name } => self.writer.write(name),
            NodeKind::ThisExpression => self.writer.write("this"),
            NodeKind::SuperExpression => self.writer.write("super"),
            NodeKind::NullLiteral => self.writer.write("null"),
            NodeKind::BooleanLiteral { value } => {
                self.writer.write(if *value { "true" } else { "false" });
            }
            NodeKind::NumericLiteral { text }
            | NodeKind::BigIntLiteral { text }
            | NodeKind::RegularExpressionLiteral { text } => self.writer.write(text),
            NodeKind::StringLiteral { value } => {
                let quoted = quote_string(value);
                self.writer.write(&quoted);
            }
            NodeKind::TemplateLiteral(data) => self.print_template(data),
            NodeKind::TaggedTemplateExpression { tag, template } => {
                self.print_node(*tag);
                self.print_node(*template);
            }
            NodeKind::ArrayLiteral { elements } => {
                self.writer.write("[");
                self.print_comma_list(&elements.nodes);
                if elements
                    .nodes
                    .last()
                    .is_some_and(|&last| matches!(self.arena.kind(last), Some(NodeKind::OmittedExpression)))
                {
                    self.writer.write(",");
                }
                self.writer.write("]");
            }
            NodeKind::ObjectLiteral { properties } => {
                if properties.is_empty() {
                    self.writer.write("{}");
                } else {
                    self.writer.write("{ ");
                    self.print_comma_list(&properties.nodes);
                    self.writer.write(" }");
                }
            }
            NodeKind::ArrowFunction(data) => self.print_arrow(data),
            NodeKind::ParenthesizedExpression { expression } => {
                self.writer.write("(");
                self.print_node(*expression);
                self.writer.write(")");
            }
            NodeKind::CallExpression {
                expression,
                arguments,
                optional,
            } => {
                self.print_node(*expression);
                if *optional {
                    self.writer.write("?.");
                }
                self.writer.write("(");
                self.print_comma_list(&arguments.nodes);
                self.writer.write(")");
            }
            NodeKind::NewExpression {
                expression,
                arguments,
            } => {
                self.writer.write("new ");
                self.print_node(*expression);
                if let Some(arguments) = arguments {
                    self.writer.write("(");
                    self.print_comma_list(&arguments.nodes);
                    self.writer.write(")");
                }
            }
            NodeKind::PropertyAccessExpression {
                expression,
                name,
                optional,
            } => {
                self.print_node(*expression);
                self.writer.write(if *optional { "?." } else { "." });
                self.print_node(*name);
            }
            NodeKind::ElementAccessExpression {
                expression,
                argument,
                optional,
            } => {
                self.print_node(*expression);
                self.writer.write(if *optional { "?.[" } else { "[" });
                self.print_node(*argument);
                self.writer.write("]");
            }
            NodeKind::PrefixUnaryExpression { operator, operand } => {
                let text = operator.token_text();
                self.writer.write(text);
                if text.ends_with(|c: char| c.is_ascii_alphabetic()) {
                    self.writer.write(" ");
                }
                self.print_node(*operand);
            }
            NodeKind::PostfixUnaryExpression { operand, operator } => {
                self.print_node(*operand);
                self.writer.write(operator.token_text());
            }
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => {
                self.print_node(*left);
                if *operator == SyntaxKind::CommaToken {
                    self.writer.write(", ");
                } else {
                    self.writer.write(" ");
                    self.writer.write(operator.token_text());
                    self.writer.write(" ");
                }
                self.print_node(*right);
            }
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                self.print_node(*condition);
                self.writer.write(" ? ");
                self.print_node(*when_true);
                self.writer.write(" : ");
                self.print_node(*when_false);
            }
            NodeKind::YieldExpression {
                expression,
                delegate,
            } => {
                self.writer.write(if *delegate { "yield*" } else { "yield" });
                if expression.is_some() {
                    self.writer.write(" ");
                    self.print_node(*expression);
                }
            }
            NodeKind::AwaitExpression { expression } => {
                self.writer.write("await ");
                self.print_node(*expression);
            }
            NodeKind::OmittedExpression => {}
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn print_keyword_statement(&mut self, keyword: &str, operand: NodeIndex) {
        self.writer.write(keyword);
        if operand.is_some() {
            self.writer.write(" ");
            self.print_node(operand);
        }
        self.writer.write(";");
    }

    fn print_block(&mut self, list: &StatementList) {
        if list.statements.is_empty() {
            self.writer.write("{}");
            return;
        }
        let outer = self.current_indent();
        let inner = format!("{outer}{}", self.indent_unit());
        self.writer.write("{");
        self.print_statement_lines(list, &inner);
        self.writer.write_line(&outer);
        self.writer.write("}");
    }

    /// One statement per line at `indent`, with attached comments.
    fn print_statement_lines(&mut self, list: &StatementList, indent: &str) {
        for (i, &statement) in list.statements.iter().enumerate() {
            if i > 0 || !indent.is_empty() {
                self.writer.write_line(indent);
            }
            let leading: Vec<_> = self.arena.leading_comments(statement).to_vec();
            for comment in leading {
                self.write_comment(comment);
                self.writer.write_line(indent);
            }
            self.print_node(statement);
        }
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn print_function(&mut self, data: &FunctionData) {
        if data.is_async {
            self.writer.write("async ");
        }
        self.writer.write(if data.is_generator { "function*" } else { "function" });
        if data.name.is_some() {
            self.writer.write(" ");
            self.print_node(data.name);
        }
        self.print_parameters(&data.parameters);
        self.writer.write(" ");
        self.print_node(data.body);
    }

    fn print_arrow(&mut self, data: &ArrowFunctionData) {
        if data.is_async {
            self.writer.write("async ");
        }
        if self.is_bare_parameter(&data.parameters) {
            self.print_node(data.parameters.nodes[0]);
        } else {
            self.print_parameters(&data.parameters);
        }
        self.writer.write(" => ");
        let wrap = matches!(
            self.arena.kind(data.body),
            Some(NodeKind::ObjectLiteral { .. })
        ) || self.arena.kind(data.body).is_some_and(|kind| {
            matches!(kind, NodeKind::BinaryExpression { operator: SyntaxKind::CommaToken, .. })
        });
        if wrap {
            self.writer.write("(");
        }
        self.print_node(data.body);
        if wrap {
            self.writer.write(")");
        }
    }

    /// A single plain identifier parameter prints without parentheses.
    fn is_bare_parameter(&self, parameters: &NodeList) -> bool {
        let [parameter] = parameters.nodes.as_slice() else {
            return false;
        };
        match self.arena.kind(*parameter) {
            Some(NodeKind::Parameter {
                name,
                initializer,
                is_rest: false,
            }) => {
                initializer.is_none()
                    && matches!(self.arena.kind(*name), Some(NodeKind::Identifier { .. }))
            }
            Some(NodeKind::Identifier { .. }) => true,
            _ => false,
        }
    }

    /// `(a, b)`: the original text when the list is untouched, which keeps
    /// comments and spacing inside the parentheses.
    fn print_parameters(&mut self, parameters: &NodeList) {
        self.writer.write("(");
        let all_pristine = parameters.nodes.iter().all(|&p| self.arena.is_pristine(p));
        if all_pristine && parameters.end > parameters.pos {
            self.copy_source(parameters.pos, parameters.end);
        } else {
            self.print_comma_list(&parameters.nodes);
        }
        self.writer.write(")");
    }

    fn print_method(&mut self, data: &MethodData) {
        if data.is_static {
            self.writer.write("static ");
        }
        if let Some(keyword) = data.kind.keyword() {
            self.writer.write(keyword);
            self.writer.write(" ");
        }
        if data.is_async {
            self.writer.write("async ");
        }
        if data.is_generator {
            self.writer.write("*");
        }
        if data.kind == MethodKind::Constructor && data.name.is_none() {
            self.writer.write("constructor");
        } else {
            self.print_node(data.name);
        }
        self.print_parameters(&data.parameters);
        self.writer.write(" ");
        self.print_node(data.body);
    }

    fn print_class(&mut self, data: &ClassData) {
        self.writer.write("class");
        if data.name.is_some() {
            self.writer.write(" ");
            self.print_node(data.name);
        }
        if data.heritage.is_some() {
            self.writer.write(" extends ");
            self.print_node(data.heritage);
        }
        if data.members.is_empty() {
            self.writer.write(" {}");
            return;
        }
        let outer = self.current_indent();
        let inner = format!("{outer}{}", self.indent_unit());
        self.writer.write(" {");
        for (i, &member) in data.members.nodes.iter().enumerate() {
            if i > 0 {
                self.writer.write_newline();
            }
            self.writer.write_line(&inner);
            let leading: Vec<_> = self.arena.leading_comments(member).to_vec();
            for comment in leading {
                self.write_comment(comment);
                self.writer.write_line(&inner);
            }
            self.print_node(member);
            let trailing: Vec<_> = self.arena.trailing_comments(member).to_vec();
            for comment in trailing {
                self.writer.write_char(' ');
                self.write_comment(comment);
            }
        }
        self.writer.write_line(&outer);
        self.writer.write("}");
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn print_template(&mut self, data: &TemplateData) {
        for (i, quasi) in data.quasis.iter().enumerate() {
            self.writer.write(quasi);
            if let Some(&expression) = data.expressions.nodes.get(i) {
                self.print_node(expression);
            }
        }
    }

    fn print_comma_list(&mut self, nodes: &[NodeIndex]) {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.print_node(node);
        }
    }

    // =========================================================================
    // Parentheses
    // =========================================================================

    /// Whether `idx` needs parentheses in its current parent. Only asked
    /// for nodes that were synthesized or moved under a synthesized parent;
    /// original text already carries its own parentheses.
    pub(super) fn needs_parens(&self, idx: NodeIndex) -> bool {
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        let Some(parent) = self.arena.get(node.parent) else {
            return false;
        };
        let own = precedence(&node.kind);
        match &parent.kind {
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => {
                if *operator == SyntaxKind::CommaToken {
                    return false;
                }
                if operator.is_assignment_operator() {
                    return *right == idx && own < PREC_ASSIGNMENT;
                }
                let level = binary_precedence(*operator);
                if *left == idx {
                    if level == PREC_EXPONENT {
                        own <= level || own == PREC_UNARY
                    } else {
                        own < level
                    }
                } else if level == PREC_EXPONENT {
                    own < level
                } else {
                    own <= level
                }
            }
            NodeKind::ConditionalExpression { condition, .. } => {
                if *condition == idx {
                    own <= PREC_CONDITIONAL
                } else {
                    own < PREC_ASSIGNMENT
                }
            }
            NodeKind::PrefixUnaryExpression { .. } | NodeKind::AwaitExpression { .. } => {
                own < PREC_UNARY
            }
            NodeKind::PostfixUnaryExpression { .. } => own < PREC_POSTFIX,
            NodeKind::PropertyAccessExpression { expression, .. }
            | NodeKind::ElementAccessExpression { expression, .. }
            | NodeKind::CallExpression { expression, .. }
            | NodeKind::NewExpression { expression, .. } => *expression == idx && own < PREC_MEMBER,
            NodeKind::TaggedTemplateExpression { tag, .. } => *tag == idx && own < PREC_MEMBER,
            NodeKind::ExpressionStatement { .. } => matches!(
                node.kind,
                NodeKind::ObjectLiteral { .. }
                    | NodeKind::FunctionExpression(_)
                    | NodeKind::ClassExpression(_)
            ),
            NodeKind::SpreadElement { .. }
            | NodeKind::VariableDeclaration { .. }
            | NodeKind::PropertyAssignment { .. }
            | NodeKind::Parameter { .. }
            | NodeKind::ArrayLiteral { .. } => own == PREC_COMMA,
            _ => false,
        }
    }
}

fn binary_precedence(operator: SyntaxKind) -> u8 {
    PREC_BINARY_BASE + operator.binary_precedence()
}

fn precedence(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::BinaryExpression { operator, .. } => {
            if *operator == SyntaxKind::CommaToken {
                PREC_COMMA
            } else if operator.is_assignment_operator() {
                PREC_ASSIGNMENT
            } else {
                binary_precedence(*operator)
            }
        }
        NodeKind::ArrowFunction(_) | NodeKind::YieldExpression { .. } => PREC_ASSIGNMENT,
        NodeKind::ConditionalExpression { .. } => PREC_CONDITIONAL,
        NodeKind::PrefixUnaryExpression { .. } | NodeKind::AwaitExpression { .. } => PREC_UNARY,
        NodeKind::PostfixUnaryExpression { .. } => PREC_POSTFIX,
        NodeKind::CallExpression { .. }
        | NodeKind::NewExpression { .. }
        | NodeKind::PropertyAccessExpression { .. }
        | NodeKind::ElementAccessExpression { .. }
        | NodeKind::TaggedTemplateExpression { .. } => PREC_MEMBER,
        _ => PREC_PRIMARY,
    }
}

/// Double-quoted JavaScript string literal for a cooked value.
pub(crate) fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_string_escapes_quotes_and_controls() {
        assert_eq!(quote_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(quote_string("\u{1}"), "\"\\x01\"");
    }

    #[test]
    fn exponent_binds_tighter_than_addition() {
        let plus = binary_precedence(SyntaxKind::PlusToken);
        assert!(PREC_EXPONENT > plus);
        assert_eq!(binary_precedence(SyntaxKind::AsteriskAsteriskToken), PREC_EXPONENT);
    }
}
