//! Parser state - expression parsing methods
//!
//! Precedence climbing for binary operators; arrow functions are detected
//! by scanning ahead over a balanced parenthesized list for `=>`.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ArrowFunctionData, MethodData, MethodKind, NodeKind, TemplateData,
};
use super::state::{
    CONTEXT_DISALLOW_IN, CONTEXT_IN_ASYNC, CONTEXT_IN_FUNCTION, CONTEXT_IN_GENERATOR, ParseResult,
    ParserState,
};
use remod_scanner::SyntaxKind;

/// Tokens after which a `/` is a division operator, not a regex.
fn ends_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateTail
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
    )
}

impl ParserState<'_> {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Comma-separated expression.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut expression = self.parse_assignment_expression()?;
        while self.parse_optional(SyntaxKind::CommaToken) {
            let right = self.parse_assignment_expression()?;
            expression = self.arena.add(
                NodeKind::BinaryExpression {
                    left: expression,
                    operator: SyntaxKind::CommaToken,
                    right,
                },
                pos,
                self.prev_end,
            );
        }
        Ok(expression)
    }

    pub(crate) fn parse_expression_allowing_in(&mut self) -> ParseResult<NodeIndex> {
        self.with_context(self.context_flags & !CONTEXT_DISALLOW_IN, |p| {
            p.parse_expression()
        })
    }

    pub(crate) fn parse_assignment_expression_allowing_in(&mut self) -> ParseResult<NodeIndex> {
        self.with_context(self.context_flags & !CONTEXT_DISALLOW_IN, |p| {
            p.parse_assignment_expression()
        })
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        if self.is_identifier_named("yield") && self.in_context(CONTEXT_IN_GENERATOR) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(arrow);
        }

        let pos = self.token_pos();
        let left = self.parse_conditional_expression()?;
        let operator = self.token();
        if operator.is_assignment_operator() {
            self.next_token();
            let right = self.parse_assignment_expression()?;
            return Ok(self.arena.add(
                NodeKind::BinaryExpression {
                    left,
                    operator,
                    right,
                },
                pos,
                self.prev_end,
            ));
        }
        Ok(left)
    }

    fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let mut delegate = false;
        let expression = if self.scanner.has_preceding_line_break()
            || matches!(
                self.token(),
                SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::EndOfFileToken
            ) {
            NodeIndex::NONE
        } else {
            delegate = self.parse_optional(SyntaxKind::AsteriskToken);
            self.parse_assignment_expression()?
        };
        Ok(self.arena.add(
            NodeKind::YieldExpression {
                expression,
                delegate,
            },
            pos,
            self.prev_end,
        ))
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    fn try_parse_arrow_function(&mut self) -> ParseResult<Option<NodeIndex>> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                if self.is_identifier_named("async") {
                    let shape = self.look_ahead(|p| {
                        let next = p.next_token();
                        if p.scanner.has_preceding_line_break() {
                            return None;
                        }
                        match next {
                            SyntaxKind::Identifier => {
                                (p.next_token() == SyntaxKind::EqualsGreaterThanToken)
                                    .then_some(true)
                            }
                            SyntaxKind::OpenParenToken => {
                                p.is_parenthesized_arrow().then_some(false)
                            }
                            _ => None,
                        }
                    });
                    if let Some(bare) = shape {
                        self.next_token();
                        return self.parse_arrow_function(pos, true, bare).map(Some);
                    }
                }
                let bare = self.look_ahead(|p| {
                    p.next_token() == SyntaxKind::EqualsGreaterThanToken
                        && !p.scanner.has_preceding_line_break()
                });
                if bare {
                    return self.parse_arrow_function(pos, false, true).map(Some);
                }
                Ok(None)
            }
            SyntaxKind::OpenParenToken => {
                if self.look_ahead(|p| p.is_parenthesized_arrow()) {
                    return self.parse_arrow_function(pos, false, false).map(Some);
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// At `(`: does the balanced group end in `) =>`? Moves the cursor, so
    /// call it inside `look_ahead`.
    fn is_parenthesized_arrow(&mut self) -> bool {
        let mut closers: Vec<SyntaxKind> = Vec::new();
        let mut previous = SyntaxKind::Unknown;
        loop {
            let token = self.token();
            match token {
                SyntaxKind::OpenParenToken => closers.push(SyntaxKind::CloseParenToken),
                SyntaxKind::OpenBracketToken => closers.push(SyntaxKind::CloseBracketToken),
                SyntaxKind::OpenBraceToken => closers.push(SyntaxKind::CloseBraceToken),
                SyntaxKind::TemplateHead => closers.push(SyntaxKind::TemplateTail),
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken => {
                    if closers.pop() != Some(token) {
                        return false;
                    }
                    if closers.is_empty() {
                        break;
                    }
                }
                SyntaxKind::CloseBraceToken => match closers.last() {
                    Some(SyntaxKind::TemplateTail) => {
                        if self.scanner.re_scan_template_continuation() == SyntaxKind::TemplateTail
                        {
                            closers.pop();
                        }
                    }
                    Some(SyntaxKind::CloseBraceToken) => {
                        closers.pop();
                    }
                    _ => return false,
                },
                SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
                    if !ends_expression(previous) =>
                {
                    self.scanner.re_scan_slash_token();
                }
                SyntaxKind::EndOfFileToken | SyntaxKind::Unknown => return false,
                _ => {}
            }
            if self.token() == SyntaxKind::Unknown {
                return false;
            }
            previous = self.token();
            self.next_token();
        }
        self.next_token() == SyntaxKind::EqualsGreaterThanToken
            && !self.scanner.has_preceding_line_break()
    }

    /// Parse an arrow function from its parameters. `pos` is the start of
    /// the whole arrow (including any `async`).
    fn parse_arrow_function(
        &mut self,
        pos: u32,
        is_async: bool,
        bare_parameter: bool,
    ) -> ParseResult<NodeIndex> {
        let parameters = if bare_parameter {
            let param_pos = self.token_pos();
            let name = self.parse_identifier()?;
            let parameter = self.arena.add(
                NodeKind::Parameter {
                    name,
                    initializer: NodeIndex::NONE,
                    is_rest: false,
                },
                param_pos,
                self.prev_end,
            );
            NodeList::with_range(vec![parameter], param_pos, self.prev_end)
        } else {
            self.parse_parameter_list()?
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?;

        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_function_body(is_async, false)?
        } else {
            let mut flags = (self.context_flags & CONTEXT_DISALLOW_IN) | CONTEXT_IN_FUNCTION;
            if is_async {
                flags |= CONTEXT_IN_ASYNC;
            }
            self.with_context(flags, |p| p.parse_assignment_expression())?
        };
        Ok(self.arena.add(
            NodeKind::ArrowFunction(ArrowFunctionData {
                parameters,
                body,
                is_async,
                bare_parameter,
            }),
            pos,
            self.prev_end,
        ))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0)?;
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return Ok(condition);
        }
        let when_true = self.parse_assignment_expression_allowing_in()?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let when_false = self.parse_assignment_expression()?;
        Ok(self.arena.add(
            NodeKind::ConditionalExpression {
                condition,
                when_true,
                when_false,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression()?;
        loop {
            let operator = self.token();
            let precedence = operator.binary_precedence();
            if precedence <= min_precedence {
                break;
            }
            if operator == SyntaxKind::InKeyword && self.in_context(CONTEXT_DISALLOW_IN) {
                break;
            }
            self.next_token();
            // `**` is right-associative.
            let right = if operator == SyntaxKind::AsteriskAsteriskToken {
                self.parse_binary_expression(precedence - 1)?
            } else {
                self.parse_binary_expression(precedence)?
            };
            left = self.arena.add(
                NodeKind::BinaryExpression {
                    left,
                    operator,
                    right,
                },
                pos,
                self.prev_end,
            );
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression()?;
                Ok(self.arena.add(
                    NodeKind::PrefixUnaryExpression { operator, operand },
                    pos,
                    self.prev_end,
                ))
            }
            SyntaxKind::Identifier
                if self.is_identifier_named("await") && self.in_context(CONTEXT_IN_ASYNC) =>
            {
                self.next_token();
                let expression = self.parse_unary_expression()?;
                Ok(self.arena.add(
                    NodeKind::AwaitExpression { expression },
                    pos,
                    self.prev_end,
                ))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let operand = self.parse_left_hand_side_expression()?;
        let operator = self.token();
        if matches!(
            operator,
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            return Ok(self.arena.add(
                NodeKind::PostfixUnaryExpression { operand, operator },
                pos,
                self.prev_end,
            ));
        }
        Ok(operand)
    }

    // =========================================================================
    // Member and call chains
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_member_tail(pos, expression, true)
    }

    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let expression = self.parse_member_tail(callee_pos, callee, false)?;
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(self.arena.add(
            NodeKind::NewExpression {
                expression,
                arguments,
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_member_tail(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> ParseResult<NodeIndex> {
        loop {
            let kind = match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name()?;
                    NodeKind::PropertyAccessExpression {
                        expression,
                        name,
                        optional: false,
                    }
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    match self.token() {
                        SyntaxKind::OpenParenToken if allow_call => NodeKind::CallExpression {
                            expression,
                            arguments: self.parse_arguments()?,
                            optional: true,
                        },
                        SyntaxKind::OpenBracketToken => {
                            self.next_token();
                            let argument = self.parse_expression_allowing_in()?;
                            self.parse_expected(SyntaxKind::CloseBracketToken)?;
                            NodeKind::ElementAccessExpression {
                                expression,
                                argument,
                                optional: true,
                            }
                        }
                        _ => NodeKind::PropertyAccessExpression {
                            expression,
                            name: self.parse_identifier_name()?,
                            optional: true,
                        },
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.parse_expression_allowing_in()?;
                    self.parse_expected(SyntaxKind::CloseBracketToken)?;
                    NodeKind::ElementAccessExpression {
                        expression,
                        argument,
                        optional: false,
                    }
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    NodeKind::TaggedTemplateExpression {
                        tag: expression,
                        template: self.parse_template_literal()?,
                    }
                }
                SyntaxKind::OpenParenToken if allow_call => NodeKind::CallExpression {
                    expression,
                    arguments: self.parse_arguments()?,
                    optional: false,
                },
                _ => return Ok(expression),
            };
            expression = self.arena.add(kind, pos, self.prev_end);
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let pos = self.prev_end;
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            arguments.push(self.parse_argument_or_element()?);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(NodeList::with_range(arguments, pos, end))
    }

    fn parse_argument_or_element(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression_allowing_in()?;
            return Ok(self.arena.add(
                NodeKind::SpreadElement { expression },
                pos,
                self.prev_end,
            ));
        }
        self.parse_assignment_expression_allowing_in()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let kind = match self.token() {
            SyntaxKind::ThisKeyword => NodeKind::ThisExpression,
            SyntaxKind::SuperKeyword => NodeKind::SuperExpression,
            SyntaxKind::NullKeyword => NodeKind::NullLiteral,
            SyntaxKind::TrueKeyword => NodeKind::BooleanLiteral { value: true },
            SyntaxKind::FalseKeyword => NodeKind::BooleanLiteral { value: false },
            SyntaxKind::NumericLiteral => NodeKind::NumericLiteral {
                text: self.scanner.token_value().to_string(),
            },
            SyntaxKind::BigIntLiteral => NodeKind::BigIntLiteral {
                text: self.scanner.token_value().to_string(),
            },
            SyntaxKind::StringLiteral => NodeKind::StringLiteral {
                value: self.scanner.token_value().to_string(),
            },
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                if self.scanner.re_scan_slash_token() != SyntaxKind::RegularExpressionLiteral {
                    return Err(self.error_unexpected());
                }
                NodeKind::RegularExpressionLiteral {
                    text: self.scanner.token_value().to_string(),
                }
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                return self.parse_template_literal();
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_expression_allowing_in()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                return Ok(self.arena.add(
                    NodeKind::ParenthesizedExpression { expression },
                    pos,
                    self.prev_end,
                ));
            }
            SyntaxKind::OpenBracketToken => return self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => return self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => return self.parse_function_expression(pos, false),
            SyntaxKind::ClassKeyword => return self.parse_class(false),
            SyntaxKind::Identifier => {
                if self.is_identifier_named("async") && self.look_ahead_is_async_function() {
                    self.next_token();
                    return self.parse_function_expression(pos, true);
                }
                return self.parse_identifier();
            }
            _ => return Err(self.error_unexpected()),
        };
        self.next_token();
        Ok(self.arena.add(kind, pos, self.prev_end))
    }

    fn parse_function_expression(&mut self, pos: u32, is_async: bool) -> ParseResult<NodeIndex> {
        let data = self.parse_function_tail(is_async, false)?;
        Ok(self
            .arena
            .add(NodeKind::FunctionExpression(data), pos, self.prev_end))
    }

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::Identifier) {
            return Err(self.error_unexpected());
        }
        self.parse_identifier_name()
    }

    /// Identifier or reserved word used as a property name.
    fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        if !self.token().is_identifier_or_keyword() {
            return Err(self.error_expected("identifier"));
        }
        let pos = self.token_pos();
        let name = self.scanner.token_text().to_string();
        self.next_token();
        Ok(self
            .arena
            .add(NodeKind::Identifier { name }, pos, self.prev_end))
    }

    /// Property key: identifier name, string, number or `[computed]`.
    pub(crate) fn parse_property_name(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                self.parse_primary_expression()
            }
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let expression = self.parse_assignment_expression_allowing_in()?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                Ok(self.arena.add(
                    NodeKind::ComputedPropertyName { expression },
                    pos,
                    self.prev_end,
                ))
            }
            _ => self.parse_identifier_name(),
        }
    }

    fn parse_template_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut quasis = vec![self.scanner.token_value().to_string()];
        let mut expressions = Vec::new();
        let head = self.token();
        self.next_token();
        if head == SyntaxKind::TemplateHead {
            let expressions_pos = self.token_pos();
            loop {
                expressions.push(self.parse_expression_allowing_in()?);
                if !self.is_token(SyntaxKind::CloseBraceToken) {
                    return Err(self.error_expected("}"));
                }
                let continuation = self.scanner.re_scan_template_continuation();
                quasis.push(self.scanner.token_value().to_string());
                match continuation {
                    SyntaxKind::TemplateMiddle => {
                        self.next_token();
                    }
                    SyntaxKind::TemplateTail => {
                        self.next_token();
                        break;
                    }
                    _ => return Err(self.error_unexpected()),
                }
            }
            let data = TemplateData {
                quasis,
                expressions: NodeList::with_range(expressions, expressions_pos, self.prev_end),
            };
            return Ok(self
                .arena
                .add(NodeKind::TemplateLiteral(data), pos, self.prev_end));
        }
        let data = TemplateData {
            quasis,
            expressions: NodeList::default(),
        };
        Ok(self
            .arena
            .add(NodeKind::TemplateLiteral(data), pos, self.prev_end))
    }

    // =========================================================================
    // Array and object literals (also destructuring patterns)
    // =========================================================================

    pub(crate) fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let elements_pos = self.prev_end;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.is_token(SyntaxKind::CommaToken) {
                let hole = self.token_pos();
                elements.push(self.arena.add(NodeKind::OmittedExpression, hole, hole));
                self.next_token();
                continue;
            }
            elements.push(self.parse_argument_or_element()?);
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        let elements_end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.arena.add(
            NodeKind::ArrayLiteral {
                elements: NodeList::with_range(elements, elements_pos, elements_end),
            },
            pos,
            self.prev_end,
        ))
    }

    pub(crate) fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let properties_pos = self.prev_end;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            properties.push(self.parse_object_property()?);
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        let properties_end = self.token_pos();
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.arena.add(
            NodeKind::ObjectLiteral {
                properties: NodeList::with_range(properties, properties_pos, properties_end),
            },
            pos,
            self.prev_end,
        ))
    }

    fn parse_object_property(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_argument_or_element();
        }
        let has_modifier = (self.is_identifier_named("get")
            || self.is_identifier_named("set")
            || self.is_identifier_named("async"))
            && self.look_ahead(|p| {
                let next = p.next_token();
                !matches!(
                    next,
                    SyntaxKind::OpenParenToken
                        | SyntaxKind::ColonToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::CloseBraceToken
                        | SyntaxKind::EqualsToken
                )
            });
        if has_modifier || self.is_token(SyntaxKind::AsteriskToken) {
            return self.parse_method_like(pos, false, false);
        }

        let name = self.parse_property_name()?;
        match self.token() {
            SyntaxKind::OpenParenToken => self.parse_method_rest(
                pos,
                MethodData {
                    kind: MethodKind::Method,
                    is_static: false,
                    name,
                    parameters: NodeList::default(),
                    body: NodeIndex::NONE,
                    is_async: false,
                    is_generator: false,
                },
            ),
            SyntaxKind::ColonToken => {
                self.next_token();
                let initializer = self.parse_assignment_expression_allowing_in()?;
                Ok(self.arena.add(
                    NodeKind::PropertyAssignment { name, initializer },
                    pos,
                    self.prev_end,
                ))
            }
            _ => {
                if !matches!(self.arena.kind(name), Some(NodeKind::Identifier { .. })) {
                    return Err(self.error_expected(":"));
                }
                // `{ a = 1 }` only occurs in destructuring patterns.
                let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.parse_assignment_expression_allowing_in()?
                } else {
                    NodeIndex::NONE
                };
                Ok(self.arena.add(
                    NodeKind::ShorthandPropertyAssignment { name, initializer },
                    pos,
                    self.prev_end,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{NodeKind, parse};

    fn first_expression(source: &str) -> (crate::ParsedFile, crate::NodeIndex) {
        let file = parse(source).unwrap();
        let program = file.arena.statement_list(file.root).unwrap();
        let statement = program.statements[0];
        let expression = match file.arena.kind(statement) {
            Some(NodeKind::ExpressionStatement { expression }) => *expression,
            other => panic!("expected expression statement, got {other:?}"),
        };
        (file, expression)
    }

    #[test]
    fn exponent_is_right_associative() {
        let (file, expression) = first_expression("a ** b ** c;");
        let NodeKind::BinaryExpression { left, right, .. } = file.arena.kind(expression).unwrap()
        else {
            panic!("expected binary expression");
        };
        assert_eq!(file.arena.identifier_name(*left), Some("a"));
        assert!(matches!(
            file.arena.kind(*right),
            Some(NodeKind::BinaryExpression { .. })
        ));
    }

    #[test]
    fn parenthesized_group_is_not_mistaken_for_arrow() {
        let (file, expression) = first_expression("(a, b) + c;");
        assert!(matches!(
            file.arena.kind(expression),
            Some(NodeKind::BinaryExpression { .. })
        ));
    }

    #[test]
    fn regex_inside_arrow_defaults_is_skipped() {
        let (file, expression) = first_expression("((a = /\\)/) => a);");
        let NodeKind::ParenthesizedExpression { expression } = file.arena.kind(expression).unwrap()
        else {
            panic!("expected parenthesized expression");
        };
        assert!(matches!(
            file.arena.kind(*expression),
            Some(NodeKind::ArrowFunction(_))
        ));
    }
}
