//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::{
    ClassData, DeclarationKind, FunctionData, MethodData, MethodKind, NodeKind, StatementList,
    VariableDeclarationListData,
};
use super::state::{
    CONTEXT_DISALLOW_IN, CONTEXT_IN_ASYNC, CONTEXT_IN_FUNCTION, CONTEXT_IN_GENERATOR, ParseResult,
    ParserState,
};
use remod_scanner::SyntaxKind;

impl ParserState<'_> {
    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Parse statements up to (not including) `terminator`.
    pub(crate) fn parse_statements_until(
        &mut self,
        terminator: SyntaxKind,
    ) -> ParseResult<Vec<NodeIndex>> {
        let mut statements = Vec::new();
        while !self.is_token(terminator) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_expected(terminator.token_text()));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    pub(crate) fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => self.parse_empty_statement(),
            SyntaxKind::VarKeyword => self.parse_variable_statement(DeclarationKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(DeclarationKind::Const),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(false),
            SyntaxKind::ClassKeyword => self.parse_class(true),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_jump_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                self.next_token();
                self.parse_semicolon()?;
                Ok(self.arena.add(NodeKind::DebuggerStatement, pos, self.prev_end))
            }
            SyntaxKind::ImportKeyword | SyntaxKind::ExportKeyword => Err(self.error_at(
                self.token_pos(),
                "Module declarations are not supported",
            )),
            SyntaxKind::Identifier => {
                if self.is_identifier_named("let") && self.look_ahead_is_let_declaration() {
                    return self.parse_variable_statement(DeclarationKind::Let);
                }
                if self.is_identifier_named("async") && self.look_ahead_is_async_function() {
                    self.next_token();
                    return self.parse_function_declaration(true);
                }
                if self.look_ahead(|p| p.next_token() == SyntaxKind::ColonToken) {
                    return self.parse_labeled_statement();
                }
                self.parse_expression_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn look_ahead_is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            matches!(
                p.next_token(),
                SyntaxKind::Identifier | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
            )
        })
    }

    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token() == SyntaxKind::FunctionKeyword && !p.scanner.has_preceding_line_break()
        })
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let inner_pos = self.prev_end;
        let statements = self.parse_statements_until(SyntaxKind::CloseBraceToken)?;
        let inner_end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeKind::Block(StatementList::new(statements, inner_pos, inner_end)),
            pos,
            self.prev_end,
        ))
    }

    /// Function bodies reset the loop/label context and enable `return`.
    pub(crate) fn parse_function_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<NodeIndex> {
        let mut flags = CONTEXT_IN_FUNCTION;
        if is_async {
            flags |= CONTEXT_IN_ASYNC;
        }
        if is_generator {
            flags |= CONTEXT_IN_GENERATOR;
        }
        self.with_context(flags, |p| p.parse_block())
    }

    fn parse_empty_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        Ok(self.arena.add(NodeKind::EmptyStatement, pos, self.prev_end))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeKind::ExpressionStatement { expression },
            pos,
            self.prev_end,
        ))
    }

    fn parse_labeled_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let label = self.parse_identifier()?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let statement = self.parse_statement()?;
        Ok(self.arena.add(
            NodeKind::LabeledStatement { label, statement },
            pos,
            self.prev_end,
        ))
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, kind: DeclarationKind) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let declaration_list = self.parse_variable_declaration_list(kind)?;
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeKind::VariableStatement { declaration_list },
            pos,
            self.prev_end,
        ))
    }

    /// Parse `var|let|const` and its declarators. The current token is the
    /// keyword.
    pub(crate) fn parse_variable_declaration_list(
        &mut self,
        kind: DeclarationKind,
    ) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let list_pos = self.token_pos();
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration()?);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let end = self.prev_end;
        Ok(self.arena.add(
            NodeKind::VariableDeclarationList(VariableDeclarationListData {
                kind,
                declarations: NodeList::with_range(declarations, list_pos, end),
                original_kind: kind,
            }),
            pos,
            end,
        ))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let name = self.parse_binding_target()?;
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.arena.add(
            NodeKind::VariableDeclaration { name, initializer },
            pos,
            self.prev_end,
        ))
    }

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_target(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            _ => Err(self.error_unexpected()),
        }
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    /// `function` declaration; the current token is `function` (any `async`
    /// has already been consumed and is reported by `is_async`).
    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<NodeIndex> {
        let pos = if is_async {
            self.prev_end - "async".len() as u32
        } else {
            self.token_pos()
        };
        let data = self.parse_function_tail(is_async, true)?;
        Ok(self
            .arena
            .add(NodeKind::FunctionDeclaration(data), pos, self.prev_end))
    }

    /// Everything after `async`: `function [*] [name] (params) { body }`.
    pub(crate) fn parse_function_tail(
        &mut self,
        is_async: bool,
        name_required: bool,
    ) -> ParseResult<FunctionData> {
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()?
        } else if name_required {
            return Err(self.error_expected("identifier"));
        } else {
            NodeIndex::NONE
        };
        let parameters = self.parse_parameter_list()?;
        let body = self.parse_function_body(is_async, is_generator)?;
        Ok(FunctionData {
            name,
            parameters,
            body,
            is_async,
            is_generator,
        })
    }

    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let pos = self.prev_end;
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            parameters.push(self.parse_parameter()?);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(NodeList::with_range(parameters, pos, end))
    }

    fn parse_parameter(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_target()?;
        let initializer = if !is_rest && self.parse_optional(SyntaxKind::EqualsToken) {
            self.with_context(self.context_flags & !CONTEXT_DISALLOW_IN, |p| {
                p.parse_assignment_expression()
            })?
        } else {
            NodeIndex::NONE
        };
        Ok(self.arena.add(
            NodeKind::Parameter {
                name,
                initializer,
                is_rest,
            },
            pos,
            self.prev_end,
        ))
    }

    /// Class declaration or expression; the current token is `class`.
    pub(crate) fn parse_class(&mut self, is_declaration: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword)?;
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()?
        } else if is_declaration {
            return Err(self.error_expected("identifier"));
        } else {
            NodeIndex::NONE
        };
        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()?
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let members_pos = self.prev_end;
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            members.push(self.parse_class_member()?);
        }
        let members_end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let data = ClassData {
            name,
            heritage,
            members: NodeList::with_range(members, members_pos, members_end),
        };
        let kind = if is_declaration {
            NodeKind::ClassDeclaration(data)
        } else {
            NodeKind::ClassExpression(data)
        };
        Ok(self.arena.add(kind, pos, self.prev_end))
    }

    fn parse_class_member(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_static = self.is_identifier_named("static")
            && self.look_ahead(|p| {
                !matches!(
                    p.next_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::EqualsToken
                )
            });
        if is_static {
            self.next_token();
        }
        let member = self.parse_method_like(pos, is_static, true)?;
        Ok(member)
    }

    /// Method, getter or setter in a class body or object literal, starting
    /// at its modifiers (`async`, `*`, `get`, `set`).
    pub(crate) fn parse_method_like(
        &mut self,
        pos: u32,
        is_static: bool,
        in_class: bool,
    ) -> ParseResult<NodeIndex> {
        let mut kind = MethodKind::Method;
        let mut is_async = false;
        if (self.is_identifier_named("get") || self.is_identifier_named("set"))
            && self.look_ahead_is_property_name_after_modifier()
        {
            kind = if self.is_identifier_named("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token();
        } else if self.is_identifier_named("async") && self.look_ahead_is_property_name_after_modifier()
        {
            is_async = true;
            self.next_token();
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name()?;
        if in_class
            && !is_static
            && kind == MethodKind::Method
            && self.arena.identifier_name(name) == Some("constructor")
        {
            kind = MethodKind::Constructor;
        }
        self.parse_method_rest(
            pos,
            MethodData {
                kind,
                is_static,
                name,
                parameters: NodeList::default(),
                body: NodeIndex::NONE,
                is_async,
                is_generator,
            },
        )
    }

    /// Parameters and body of a method whose header is already parsed.
    pub(crate) fn parse_method_rest(
        &mut self,
        pos: u32,
        mut data: MethodData,
    ) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return Err(self.error_expected("("));
        }
        data.parameters = self.parse_parameter_list()?;
        data.body = self.parse_function_body(data.is_async, data.is_generator)?;
        Ok(self
            .arena
            .add(NodeKind::MethodDeclaration(data), pos, self.prev_end))
    }

    /// After `get`/`set`/`async`: is a property name (not `(`, `:`, `,`)
    /// following on the same line?
    fn look_ahead_is_property_name_after_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            let next = p.next_token();
            (next.is_identifier_or_keyword()
                || matches!(
                    next,
                    SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::OpenBracketToken
                        | SyntaxKind::AsteriskToken
                ))
                && !p.scanner.has_preceding_line_break()
        })
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let expression = self.parse_expression_allowing_in()?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(expression)
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        let then_statement = self.parse_statement()?;
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.arena.add(
            NodeKind::IfStatement {
                expression,
                then_statement,
                else_statement,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        let statement = self.parse_statement()?;
        Ok(self.arena.add(
            NodeKind::WhileStatement {
                expression,
                statement,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_do_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement()?;
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let expression = self.parse_parenthesized_condition()?;
        // `do ... while (x)` needs no semicolon even on the same line.
        self.parse_optional(SyntaxKind::SemicolonToken);
        Ok(self.arena.add(
            NodeKind::DoStatement {
                statement,
                expression,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        let statement = self.parse_statement()?;
        Ok(self.arena.add(
            NodeKind::WithStatement {
                expression,
                statement,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken)?;

        let disallow_in = self.context_flags | CONTEXT_DISALLOW_IN;
        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword => self.with_context(disallow_in, |p| {
                p.parse_variable_declaration_list(DeclarationKind::Var)
            })?,
            SyntaxKind::ConstKeyword => self.with_context(disallow_in, |p| {
                p.parse_variable_declaration_list(DeclarationKind::Const)
            })?,
            _ if self.is_identifier_named("let") && self.look_ahead_is_let_declaration() => self
                .with_context(disallow_in, |p| {
                    p.parse_variable_declaration_list(DeclarationKind::Let)
                })?,
            _ => self.with_context(disallow_in, |p| p.parse_expression())?,
        };

        if initializer.is_some()
            && (self.is_token(SyntaxKind::InKeyword) || self.is_identifier_named("of"))
        {
            let is_of = self.is_identifier_named("of");
            self.next_token();
            let expression = if is_of {
                self.parse_assignment_expression_allowing_in()?
            } else {
                self.parse_expression_allowing_in()?
            };
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            let kind = if is_of {
                NodeKind::ForOfStatement {
                    initializer,
                    expression,
                    statement,
                }
            } else {
                NodeKind::ForInStatement {
                    initializer,
                    expression,
                    statement,
                }
            };
            return Ok(self.arena.add(kind, pos, self.prev_end));
        }

        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_allowing_in()?
        };
        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_allowing_in()?
        };
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement()?;
        Ok(self.arena.add(
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if !self.in_context(CONTEXT_IN_FUNCTION) {
            return Err(self.error_at(pos, "A 'return' statement can only be used within a function body"));
        }
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression_allowing_in()?
        };
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeKind::ReturnStatement { expression },
            pos,
            self.prev_end,
        ))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        if self.scanner.has_preceding_line_break() {
            return Err(self.error_at(self.token_pos(), "Line break not permitted here"));
        }
        let expression = self.parse_expression_allowing_in()?;
        self.parse_semicolon()?;
        Ok(self.arena.add(
            NodeKind::ThrowStatement { expression },
            pos,
            self.prev_end,
        ))
    }

    fn parse_jump_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if self.is_token(SyntaxKind::Identifier) && !self.scanner.has_preceding_line_break()
        {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        let kind = if is_break {
            NodeKind::BreakStatement { label }
        } else {
            NodeKind::ContinueStatement { label }
        };
        Ok(self.arena.add(kind, pos, self.prev_end))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block()?;
        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let variable = self.parse_binding_target()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                variable
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block()?;
            self.arena.add(
                NodeKind::CatchClause { variable, block },
                catch_pos,
                self.prev_end,
            )
        } else {
            NodeIndex::NONE
        };
        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()?
        } else {
            NodeIndex::NONE
        };
        if catch_clause.is_none() && finally_block.is_none() {
            return Err(self.error_expected("catch"));
        }
        Ok(self.arena.add(
            NodeKind::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let clauses_pos = self.prev_end;
        let mut clauses = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            clauses.push(self.parse_case_clause()?);
        }
        let clauses_end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeKind::SwitchStatement {
                expression,
                clauses: NodeList::with_range(clauses, clauses_pos, clauses_end),
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_case_clause(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = match self.token() {
            SyntaxKind::CaseKeyword => {
                self.next_token();
                self.parse_expression_allowing_in()?
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                NodeIndex::NONE
            }
            _ => return Err(self.error_expected("case")),
        };
        self.parse_expected(SyntaxKind::ColonToken)?;
        let inner_pos = self.prev_end;
        let mut statements = Vec::new();
        while !matches!(
            self.token(),
            SyntaxKind::CaseKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
        ) {
            statements.push(self.parse_statement()?);
        }
        // A clause runs up to the next clause, so clauses tile the switch body.
        let inner_end = self.token_pos();
        Ok(self.arena.add(
            NodeKind::CaseClause {
                expression,
                statements: StatementList::new(statements, inner_pos, inner_end),
            },
            pos,
            inner_end,
        ))
    }
}
